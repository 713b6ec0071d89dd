fn main() -> anyhow::Result<()> {
    tasknotes::cli::run()
}
