//! `fixroute init` — Write a default node configuration.

use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (defaults to current directory).
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Core Lightning REST endpoint to write into the config.
    #[arg(long, default_value = "https://127.0.0.1:3010")]
    pub upstream: String,
}

fn render_config(upstream: &str) -> String {
    format!(
        r#"# fixroute node configuration

[upstream]
endpoint = "{upstream}"
# rune = "<rune with listchannels, listnodes and getroute permissions>"
timeout_secs = 60
accept_invalid_certs = false

[api]
listen_addr = "127.0.0.1"
port = 9737

[routing]
min_final_cltv = 9
risk_factor = 1

[logging]
level = "info"
format = "text"
"#
    )
}

pub fn run(args: &InitArgs) -> anyhow::Result<()> {
    let config_path = args.dir.join("fixroute.toml");

    if config_path.exists() {
        anyhow::bail!("configuration file already exists at {}", config_path.display());
    }

    std::fs::create_dir_all(&args.dir)?;
    std::fs::write(&config_path, render_config(&args.upstream))?;

    println!("Initialized fixroute config at {}", config_path.display());
    println!("Set upstream.rune in fixroute.toml, then run 'fixroute-node'.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendered_config_is_valid_toml() {
        let rendered = render_config("https://10.0.0.2:3010");
        let value: toml::Value = toml::from_str(&rendered).unwrap();
        assert_eq!(value["upstream"]["endpoint"].as_str(), Some("https://10.0.0.2:3010"));
        assert_eq!(value["api"]["port"].as_integer(), Some(9737));
        assert_eq!(value["routing"]["min_final_cltv"].as_integer(), Some(9));
        assert!(value["upstream"].get("rune").is_none());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = std::env::temp_dir().join(format!("fixroute-init-{}", std::process::id()));
        let args = InitArgs {
            dir: dir.clone(),
            upstream: "https://127.0.0.1:3010".into(),
        };
        run(&args).unwrap();
        assert!(dir.join("fixroute.toml").exists());
        assert!(run(&args).is_err());
        std::fs::remove_dir_all(&dir).ok();
    }
}
