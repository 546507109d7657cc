use log::{error, info};
use std::{fs, path::Path};

pub fn create_folder(root_path: &str) {
    let path = Path::new(root_path);

    if path.is_dir() {
        info!("folder already exists: {}", root_path);
        return;
    }

    match fs::create_dir_all(path) {
        Ok(_) => info!("folder created: {}", root_path),
        Err(err) => error!("error creating folder {}: {}", root_path, err),
    }
}
