use crate::card::database::{LandDatabase, LandDatabaseError};
use crate::card::types::ManaSource;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LandPoolError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid pool format at line {line}: {reason}")]
    InvalidFormat { line: usize, reason: String },
    #[error("Land database error: {0}")]
    DatabaseError(#[from] LandDatabaseError),
}

/// Parse a land pool file and return one source per land copy, in file order
/// Format: "4 Land Name" per line, supports comments with # or //
pub fn parse_pool_file(
    path: &str,
    database: &LandDatabase,
) -> Result<Vec<ManaSource>, LandPoolError> {
    let content = std::fs::read_to_string(path)?;
    parse_pool(&content, database)
}

pub fn parse_pool(content: &str, database: &LandDatabase) -> Result<Vec<ManaSource>, LandPoolError> {
    let mut pool = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
            continue;
        }

        let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
        if parts.len() != 2 {
            return Err(LandPoolError::InvalidFormat {
                line: line_num + 1,
                reason: "Expected format: 'COUNT LAND_NAME'".to_string(),
            });
        }

        let count_str = parts[0];
        let land_name = parts[1].trim();

        let count: usize = count_str.parse().map_err(|_| LandPoolError::InvalidFormat {
            line: line_num + 1,
            reason: format!("'{}' is not a valid number", count_str),
        })?;

        let land = database.get_land(land_name)?;
        let source = land.to_source();

        for _ in 0..count {
            pool.push(source.clone());
        }
    }

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn database() -> LandDatabase {
        LandDatabase::from_file("lands.json").expect("Failed to load lands")
    }

    #[test]
    fn test_parse_pool_file() {
        let pool = parse_pool_file("pool.txt", &database()).expect("Failed to parse pool");
        assert_eq!(pool.len(), 6, "Pool should have 6 lands");

        let plains = pool
            .iter()
            .filter(|s| s.name.as_deref() == Some("Plains"))
            .count();
        assert_eq!(plains, 2, "Should have 2 Plains");
    }

    #[test]
    fn test_pool_keeps_file_order() {
        let pool = parse_pool("1 Swamp\n2 Forest\n", &database()).unwrap();
        let names: Vec<_> = pool.iter().filter_map(|s| s.name.as_deref()).collect();
        assert_eq!(names, vec!["Swamp", "Forest", "Forest"]);
    }

    #[test]
    fn test_invalid_count() {
        let result = parse_pool("x Swamp", &database());
        assert!(matches!(
            result,
            Err(LandPoolError::InvalidFormat { line: 1, .. })
        ));
    }

    #[test]
    fn test_missing_count() {
        let result = parse_pool("# header\nSwamp", &database());
        assert!(matches!(
            result,
            Err(LandPoolError::InvalidFormat { line: 2, .. })
        ));
    }

    #[test]
    fn test_unknown_land() {
        let result = parse_pool("1 Nonexistent Land", &database());
        assert!(matches!(result, Err(LandPoolError::DatabaseError(_))));
    }
}
