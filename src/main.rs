//! studio - command-line entry point

fn main() -> anyhow::Result<()> {
    studio_git::cli::run()
}
