use tracktag::cli::run;

fn main() -> anyhow::Result<()> {
    run()
}
