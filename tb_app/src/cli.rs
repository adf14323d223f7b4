/// Config file path from the first command-line argument
pub fn get_config_path(default: &str) -> String {
    config_path_from(std::env::args(), default)
}

fn config_path_from(args: impl IntoIterator<Item = String>, default: &str) -> String {
    args.into_iter().nth(1).unwrap_or_else(|| default.to_string())
}
