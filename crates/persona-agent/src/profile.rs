//! Loading the persona from disk.

use std::fs;
use std::path::Path;

use persona_agent_core::Persona;

use crate::config::ConfigError;

/// Reads the display name and the profile document and builds a persona.
///
/// The name is trimmed. The profile is kept verbatim.
pub fn load_persona(
    name_path: &Path,
    profile_path: &Path,
) -> Result<Persona, ConfigError> {
    let name = read_text(name_path)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ConfigError::EmptyProfile {
            path: name_path.to_owned(),
        });
    }
    let profile = read_text(profile_path)?;

    info!(profile_name = name, "profile loaded");
    Ok(Persona::new(name, profile))
}

fn read_text(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::ReadProfile {
        path: path.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use tempfile::TempDir;

    use super::*;

    fn write(dir: &TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_persona() {
        let dir = TempDir::new().unwrap();
        let name = write(&dir, "name.txt", b"  Ada Lovelace\n");
        let profile = write(&dir, "profile.md", b"# Ada\n\nMathematician.\n");

        let persona = load_persona(&name, &profile).unwrap();
        assert_eq!(persona.display_name(), "Ada Lovelace");
        assert_eq!(persona.profile_text(), "# Ada\n\nMathematician.\n");
    }

    #[test]
    fn test_load_failures() {
        let dir = TempDir::new().unwrap();
        let name = write(&dir, "name.txt", b"\n");
        let profile = write(&dir, "profile.md", b"Mathematician.");
        let err = load_persona(&name, &profile).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyProfile { path } if path == name));

        let name = write(&dir, "name.txt", b"Ada");
        let missing = dir.path().join("missing.md");
        let err = load_persona(&name, &missing).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ReadProfile { ref source, .. }
                if source.kind() == ErrorKind::NotFound
        ));

        let invalid = write(&dir, "invalid.md", &[0xff, 0xfe, 0x00]);
        let err = load_persona(&name, &invalid).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ReadProfile { ref source, .. }
                if source.kind() == ErrorKind::InvalidData
        ));
    }
}
