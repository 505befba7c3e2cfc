fn main() -> anyhow::Result<()> {
    tlc_dashboard_lib::run()
}
