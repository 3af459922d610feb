use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use syspkg::package_manager::{self, PackageManager, SUPPORTED};
use syspkg::{report, Config, Options, PackageInfo};

#[derive(Parser)]
#[command(name = "syspkg", version, about = "One interface for apt, dnf and friends")]
struct Cli {
    /// 指定后端（默认按配置顺序自动检测）
    #[arg(short, long, global = true)]
    manager: Option<String>,

    #[arg(long, global = true)]
    dry_run: bool,

    #[arg(long, global = true)]
    interactive: bool,

    #[arg(short, long, global = true)]
    verbose: bool,

    /// 以 JSON 输出结果
    #[arg(long, global = true)]
    json: bool,

    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Install packages
    Install { packages: Vec<String> },
    /// Remove packages
    Delete { packages: Vec<String> },
    /// Refresh the package index
    Refresh,
    /// Search packages by keyword
    Find { keywords: Vec<String> },
    /// List installed packages
    ListInstalled,
    /// List packages with pending upgrades
    ListUpgradable,
    /// Upgrade the given packages, or everything when none are given
    Upgrade { packages: Vec<String> },
    /// Show details of one package
    Info { package: String },
    /// Clean the local package cache
    Clean,
    /// Remove packages that are no longer needed
    Autoremove,
    /// Show which package managers are available
    Managers,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    // 加载配置
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load_or_default()?,
    };

    // 命令行开关优先于配置文件
    let defaults = config.options();
    let opts = Options {
        interactive: cli.interactive || defaults.interactive,
        dry_run: cli.dry_run || defaults.dry_run,
        verbose: cli.verbose || defaults.verbose,
    };

    if let Command::Managers = cli.command {
        for name in SUPPORTED {
            let available = package_manager::by_name(name)?.is_available();
            println!("{:<6} {}", name, if available { "available" } else { "not found" });
        }
        return Ok(());
    }

    let manager = select_manager(cli.manager.as_deref(), &config)?;
    log::info!("using package manager: {}", manager.name());

    let packages = match cli.command {
        Command::Install { packages } => manager.install(&packages, &opts)?,
        Command::Delete { packages } => manager.delete(&packages, &opts)?,
        Command::Refresh => {
            manager.refresh(&opts)?;
            return Ok(());
        }
        Command::Find { keywords } => manager.find(&keywords, &opts)?,
        Command::ListInstalled => manager.list_installed(&opts)?,
        Command::ListUpgradable => manager.list_upgradable(&opts)?,
        Command::Upgrade { packages } if packages.is_empty() => manager.upgrade_all(&opts)?,
        Command::Upgrade { packages } => manager.upgrade(&packages, &opts)?,
        Command::Info { package } => vec![manager.get_package_info(&package, &opts)?],
        Command::Clean => {
            manager.clean(&opts)?;
            return Ok(());
        }
        Command::Autoremove => manager.auto_remove(&opts)?,
        Command::Managers => unreachable!("handled above"),
    };

    print_packages(&packages, cli.json)
}

fn select_manager(requested: Option<&str>, config: &Config) -> Result<Box<dyn PackageManager>> {
    if let Some(name) = requested {
        let manager = package_manager::by_name(name)?;
        if !manager.is_available() {
            anyhow::bail!("{} is not available on this system", name);
        }
        return Ok(manager);
    }

    let mut found = package_manager::detect(&config.managers)?;
    Ok(found.remove(0))
}

fn print_packages(packages: &[PackageInfo], json: bool) -> Result<()> {
    if json {
        println!("{}", report::render_json(packages)?);
    } else {
        print!("{}", report::render_table(packages));
    }
    Ok(())
}
