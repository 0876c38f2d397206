use clap::Parser;
use miette::Result;
use pcfg::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    init_tracing(global.verbose);

    match cli.command {
        Commands::Init(args) => pcfg::cli::commands::init::run(args),
        Commands::Catalog(cmd) => pcfg::cli::commands::catalog::run(cmd, &global),
        Commands::Options(args) => pcfg::cli::commands::options::run(args, &global),
        Commands::Configure(args) => pcfg::cli::commands::configure::run(args, &global),
        Commands::Submit(args) => pcfg::cli::commands::submit::run(args, &global),
        Commands::Config(cmd) => pcfg::cli::commands::config::run(cmd),
        Commands::Completions(args) => pcfg::cli::commands::completions::run(args),
    }
}

/// Log to stderr, filtered by `PCFG_LOG` (or `RUST_LOG`)
///
/// Submissions through the log sink are info events, so they stay visible at
/// the default level.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "pcfg=debug"
    } else {
        "warn,pcfg::submission=info"
    };

    let filter = EnvFilter::try_from_env("PCFG_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .init();
}
