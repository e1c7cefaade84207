use std::error::Error;

use log::info;
use skiplist_kv::{SkipList, STORE_FILE};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let list: SkipList<i32, String> = SkipList::new(6);
    for (key, value) in [(1, "pppp"), (3, "cccc"), (7, "7777"), (8, "qqqq"), (9, "llll")] {
        let outcome = list.insert(key, value.to_string());
        info!("insert {} -> {:?}", key, outcome);
    }
    list.display_all();

    info!("insert 19 -> {:?}", list.insert(19, "zzzz".to_string()));
    info!("insert 19 again -> {:?}", list.insert(19, "dddd".to_string()));
    info!("size: {}", list.len());

    for key in [9, 18] {
        match list.get(&key) {
            Some(value) => info!("found key {}, value {}", key, value),
            None => info!("key {} not found", key),
        }
    }

    for key in [3, 7] {
        info!("delete {} -> {:?}", key, list.remove(&key));
    }
    info!("size: {}", list.len());
    list.display_all();

    let path = std::env::temp_dir().join(STORE_FILE);
    let written = list.dump_to_path(&path)?;
    info!("dumped {} records to {}", written, path.display());

    let reloaded: SkipList<i32, String> = SkipList::new(6);
    let report = reloaded.load_from_path(&path)?;
    info!("reloaded from {}: {:?}", path.display(), report);
    reloaded.display_all();

    std::fs::remove_file(&path)?;
    Ok(())
}
