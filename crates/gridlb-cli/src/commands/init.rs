use std::path::Path;

use gridlb_core::{GridlbConfig, Metric, Mode};

pub fn init_config(path: &Path, metric: Metric, mode: Mode, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let config = GridlbConfig::scaffold(metric, mode);
    std::fs::write(path, config.to_toml_string()?)?;
    println!("✓ Generated {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_then_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gridlb.toml");

        init_config(&path, Metric::Memory, Mode::Avg, false).unwrap();

        let config = GridlbConfig::from_file(&path).unwrap();
        assert_eq!(config.balancing.metric, Metric::Memory);
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gridlb.toml");
        std::fs::write(&path, "# keep me\n").unwrap();

        assert!(init_config(&path, Metric::Cpu, Mode::Avg, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# keep me\n");

        init_config(&path, Metric::Cpu, Mode::Avg, true).unwrap();
        assert!(GridlbConfig::from_file(&path).is_ok());
    }
}
