use std::fs;

const CONFIG_PATH: &str = "src/default_config.toml";
const PATH_KEYS: [&str; 4] = ["content", "static", "public", "template"];

fn main() {
    println!("cargo:rerun-if-changed={CONFIG_PATH}");

    let content = fs::read_to_string(CONFIG_PATH).expect("Failed to read default_config.toml");
    let table = match content.parse::<toml::Table>() {
        Ok(table) => table,
        Err(e) => panic!("Invalid default_config.toml: {e}"),
    };

    // Every site path must be present as a string so the embedded default
    // deserializes to a complete `Config`.
    let Some(paths) = table.get("paths").and_then(|v| v.as_table()) else {
        panic!("default_config.toml is missing the [paths] table");
    };
    for key in paths.keys() {
        if !PATH_KEYS.contains(&key.as_str()) {
            panic!("default_config.toml has unknown key paths.{key}");
        }
    }
    for key in PATH_KEYS {
        if !paths.get(key).is_some_and(|v| v.is_str()) {
            panic!("default_config.toml needs a string paths.{key}");
        }
    }
}
