use ctxcat::cli::commands::run;

fn main() -> anyhow::Result<()> {
    run()
}
