use anyhow::Result;
use sqlx::{Executor, PgPool};
use tracing::info;

/// Migration scripts compiled into the binary, keyed by file name.
const MIGRATIONS: &[(&str, &str)] = &[
    (
        "001_create_cameras.sql",
        include_str!("sql/001_create_cameras.sql"),
    ),
    (
        "002_create_motion_events.sql",
        include_str!("sql/002_create_motion_events.sql"),
    ),
    (
        "003_create_images.sql",
        include_str!("sql/003_create_images.sql"),
    ),
    (
        "004_create_detections.sql",
        include_str!("sql/004_create_detections.sql"),
    ),
    (
        "005_create_alerts.sql",
        include_str!("sql/005_create_alerts.sql"),
    ),
    ("add_indexes.sql", include_str!("sql/add_indexes.sql")),
];

/// Numbered files run in numeric order, `add_indexes` after every table.
fn order_value(name: &str) -> usize {
    if name.starts_with("add_indexes") {
        return 2000;
    }
    name.split('_')
        .next()
        .and_then(|prefix| prefix.parse::<usize>().ok())
        .unwrap_or(usize::MAX)
}

fn ordered_migrations() -> Vec<(&'static str, &'static str)> {
    let mut entries = MIGRATIONS.to_vec();
    entries.sort_by_key(|(name, _)| order_value(name));
    entries
}

/// Apply every migration. Scripts are idempotent, so re-running is safe.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    for (name, sql) in ordered_migrations() {
        execute_migration(pool, sql).await?;
        info!("Applied migration: {}", name);
    }

    Ok(())
}

async fn execute_migration(pool: &PgPool, sql: &str) -> Result<()> {
    pool.execute(sql).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_created_parent_first() {
        let names: Vec<_> = ordered_migrations().into_iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            vec![
                "001_create_cameras.sql",
                "002_create_motion_events.sql",
                "003_create_images.sql",
                "004_create_detections.sql",
                "005_create_alerts.sql",
                "add_indexes.sql",
            ]
        );
    }

    #[test]
    fn scripts_name_the_mapped_constraints() {
        let all: String = MIGRATIONS.iter().map(|(_, sql)| *sql).collect();
        for constraint in [
            "cameras_address_key",
            "motion_events_camera_id_fkey",
            "detections_confidence_check",
            "alerts_detection_id_fkey",
        ] {
            assert!(all.contains(constraint), "missing {}", constraint);
        }
        assert!(all.contains("ON DELETE CASCADE"));
    }
}
