fn main() -> anyhow::Result<()> {
    timebomb_lib::run()
}
