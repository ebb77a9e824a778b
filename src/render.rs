use crate::models::{ApplicationRecord, Palette, StatusTab, TabCount};
use std::fmt::Write;

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn badge(&self, text: &str, palette: Palette) -> String {
        if !self.color {
            return format!("[{}]", text);
        }
        match (hex_rgb(palette.background), hex_rgb(palette.foreground)) {
            (Some((br, bg, bb)), Some((fr, fg, fb))) => format!(
                "\x1b[48;2;{};{};{}m\x1b[38;2;{};{};{}m {} \x1b[0m",
                br, bg, bb, fr, fg, fb, text
            ),
            _ => format!("[{}]", text),
        }
    }

    pub fn tab_bar(&self, tabs: &[TabCount], active: &StatusTab) -> String {
        tabs.iter()
            .map(|entry| {
                let label = format!("{} ({})", entry.label, entry.count);
                if &entry.tab == active {
                    format!("▶{}", label)
                } else {
                    format!(" {}", label)
                }
            })
            .collect::<Vec<_>>()
            .join(" │")
    }

    pub fn card(&self, record: &ApplicationRecord) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{}  {}",
            record.project_name,
            self.badge(record.status.as_str(), record.status.palette())
        );
        let _ = writeln!(out, "  {}", record.location);
        let _ = writeln!(
            out,
            "  ID: {}  提出日: {}  更新: {}",
            record.id, record.submit_date, record.last_update
        );

        let mut tags = vec![self.badge(&format!("緊急度: {}", record.urgency.as_str()), record.urgency.palette())];
        if record.revisions > 0 {
            tags.push(self.badge(&format!("修正回数: {}", record.revisions), Palette::NEUTRAL));
        }
        let _ = writeln!(out, "  {}", tags.join(" "));

        let _ = writeln!(out, "  コメント");
        if record.comments.is_empty() {
            let _ = writeln!(out, "    (なし)");
        }
        for comment in &record.comments {
            let _ = writeln!(out, "    {}  {}", comment.user, comment.date);
            let _ = writeln!(out, "      {}", comment.text);
        }
        out
    }

    pub fn list(&self, records: &[&ApplicationRecord]) -> String {
        if records.is_empty() {
            return "該当する案件はありません\n".to_string();
        }
        records
            .iter()
            .map(|record| self.card(record))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(digits.get(range)?, 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
