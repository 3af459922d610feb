use std::cell::RefCell;

use syspkg::package_manager::apt::AptManager;
use syspkg::{CommandOutput, CommandRunner, Error, Options, PackageManager, PackageStatus, Result};

/// 按程序名返回固定输出的执行器
struct FakeSystem {
    replies: Vec<(&'static str, CommandOutput)>,
    calls: RefCell<Vec<String>>,
}

impl FakeSystem {
    fn new() -> Self {
        Self { replies: Vec::new(), calls: RefCell::new(Vec::new()) }
    }

    fn on(mut self, program: &'static str, stdout: &str, stderr: &str, code: i32) -> Self {
        self.replies.push((
            program,
            CommandOutput { stdout: stdout.to_string(), stderr: stderr.to_string(), code: Some(code) },
        ));
        self
    }
}

impl CommandRunner for &FakeSystem {
    fn run(&self, program: &str, args: &[String], _env: &[(&str, &str)]) -> Result<CommandOutput> {
        self.calls.borrow_mut().push(format!("{} {}", program, args.join(" ")));
        self.replies
            .iter()
            .find(|(name, _)| *name == program)
            .map(|(_, out)| out.clone())
            .ok_or_else(|| Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, program.to_string())))
    }
}

const SEARCH_OUTPUT: &str = "\
Sorting...
Full Text Search...
htop/jammy,now 3.0.5-7build2 amd64 [installed]
  interactive processes viewer

btop/jammy 1.2.3-1 amd64
  Modern and colorful command line resource monitor that shows usage and stats

nvtop/jammy 1.2.2-1 amd64
  Interactive NVIDIA GPU process monitor
";

const DPKG_STATUS_OUTPUT: &str = "\
htop install ok installed 3.0.5-7build2
btop deinstall ok config-files 1.2.3-1
";

#[test]
fn search_resolves_status_through_dpkg_query() {
    let system = FakeSystem::new().on("apt", SEARCH_OUTPUT, "", 0).on(
        "dpkg-query",
        DPKG_STATUS_OUTPUT,
        "dpkg-query: no packages found matching nvtop\n",
        1,
    );
    let apt = AptManager::with_runner(&system);

    let packages = apt.find(&["top".to_string()], &Options::default()).unwrap();
    assert_eq!(packages.len(), 3);

    assert_eq!(packages[0].name, "htop");
    assert_eq!(packages[0].status, PackageStatus::Installed);
    assert_eq!(packages[0].category, "jammy,now");

    assert_eq!(packages[1].name, "btop");
    assert_eq!(packages[1].status, PackageStatus::Available);
    assert_eq!(packages[1].version, "1.2.3-1");

    assert_eq!(packages[2].name, "nvtop");
    assert_eq!(packages[2].status, PackageStatus::Unknown);
    assert_eq!(packages[2].version, "");
    assert_eq!(packages[2].new_version, "1.2.2-1");

    let calls = system.calls.borrow();
    assert_eq!(calls[0], "apt search top");
    assert!(calls[1].starts_with("dpkg-query -W --showformat"));
    assert!(calls[1].ends_with("htop btop nvtop"));
}

#[test]
fn search_with_no_matches_does_not_query_dpkg() {
    let system = FakeSystem::new().on("apt", "Sorting...\nFull Text Search...\n", "", 0);
    let apt = AptManager::with_runner(&system);

    let packages = apt.find(&["nothing-matches".to_string()], &Options::default()).unwrap();
    assert!(packages.is_empty());
    assert_eq!(system.calls.borrow().len(), 1);
}

#[test]
fn list_upgradable_ignores_apt_cli_warning() {
    let system = FakeSystem::new().on(
        "apt",
        "Listing...\nfoo/jammy 2.0 amd64 [upgradable from: 1.0]\n",
        "\nWARNING: apt does not have a stable CLI interface. Use with caution in scripts.\n\n",
        0,
    );
    let apt = AptManager::with_runner(&system);

    let packages = apt.list_upgradable(&Options::default()).unwrap();
    assert_eq!(packages.len(), 1);
    assert_eq!(packages[0].name, "foo");
    assert_eq!(packages[0].version, "1.0");
    assert_eq!(packages[0].new_version, "2.0");
    assert_eq!(packages[0].status, PackageStatus::Upgradable);
}

#[test]
fn list_installed_uses_dpkg_query_format() {
    let system = FakeSystem::new().on("dpkg-query", "bash 5.1-6ubuntu1\nlibc6:amd64 2.35-0ubuntu3.6\n", "", 0);
    let apt = AptManager::with_runner(&system);

    let packages = apt.list_installed(&Options::default()).unwrap();
    let names: Vec<&str> = packages.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["bash", "libc6"]);
    assert_eq!(system.calls.borrow()[0], "dpkg-query -W -f ${binary:Package} ${Version}\n");
}

#[test]
fn upgrade_all_and_autoremove_parse_their_output() {
    let system = FakeSystem::new().on(
        "apt",
        "Setting up openssl (3.0.2-0ubuntu1.15) ...\nRemoving linux-headers-5.15.0-91 (5.15.0-91.101) ...\n",
        "",
        0,
    );
    let apt = AptManager::with_runner(&system);

    let upgraded = apt.upgrade_all(&Options::default()).unwrap();
    assert_eq!(upgraded.len(), 1);
    assert_eq!(upgraded[0].name, "openssl");
    assert_eq!(upgraded[0].status, PackageStatus::Installed);

    let removed = apt.auto_remove(&Options::default()).unwrap();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].name, "linux-headers-5.15.0-91");
    assert_eq!(removed[0].status, PackageStatus::Available);

    let calls = system.calls.borrow();
    assert_eq!(calls[0], "apt upgrade -y");
    assert_eq!(calls[1], "apt autoremove -y");
}

#[test]
fn package_info_comes_from_apt_cache() {
    let system = FakeSystem::new().on(
        "apt-cache",
        "Package: jq\nVersion: 1.6-2.1ubuntu3\nArchitecture: amd64\nSection: utils\n",
        "",
        0,
    );
    let apt = AptManager::with_runner(&system);

    let pkg = apt.get_package_info("jq", &Options::default()).unwrap();
    assert_eq!(pkg.name, "jq");
    assert_eq!(pkg.version, "1.6-2.1ubuntu3");
    assert_eq!(pkg.arch, "amd64");
    assert_eq!(pkg.category, "utils");
    assert_eq!(pkg.package_manager, "apt");
    assert_eq!(system.calls.borrow()[0], "apt-cache show jq");
}

#[test]
fn refresh_failure_surfaces_output() {
    let system = FakeSystem::new().on("apt", "", "E: Could not open lock file /var/lib/apt/lists/lock\n", 100);
    let apt = AptManager::with_runner(&system);

    let err = apt.refresh(&Options::default()).unwrap_err();
    assert!(err.to_string().contains("Could not open lock file"));
}
