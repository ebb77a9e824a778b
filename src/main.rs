fn main() -> anyhow::Result<()> {
    permit_desk_lib::run()
}
