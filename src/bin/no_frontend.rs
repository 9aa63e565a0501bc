use std::path::PathBuf;

use structopt::StructOpt;

use vcpu_editor::editor::browser::{DirectoryBrowser, FileKind, OsFileSystem};
use vcpu_editor::editor::config::GRID_H;

/// List the vCPU programs the editor's browser would offer.
#[derive(StructOpt)]
struct Opt {
    /// Directory of vCPU programs
    #[structopt(parse(from_os_str), default_value = "./vCPU")]
    vcpu_dir: PathBuf,
}

fn main() -> std::io::Result<()> {
    env_logger::init();

    let opt = Opt::from_args();
    log::info!("Listing {:?}", &opt.vcpu_dir);
    if !opt.vcpu_dir.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a directory", opt.vcpu_dir.display()),
        ));
    }

    let mut browser = DirectoryBrowser::new(OsFileSystem, opt.vcpu_dir, GRID_H);
    browser.browse();
    for entry in browser.entries() {
        match entry.kind {
            FileKind::Dir => println!("{}/", entry.name),
            FileKind::File => println!("{}", entry.name),
        }
    }

    Ok(())
}
