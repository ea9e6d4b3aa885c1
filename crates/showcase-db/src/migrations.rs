use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id                  INTEGER PRIMARY KEY,
            profile_id          TEXT NOT NULL UNIQUE,
            username            TEXT NOT NULL UNIQUE,
            name                TEXT NOT NULL,
            intro_text          TEXT NOT NULL DEFAULT '',
            profile_picture     TEXT,
            cover_image         TEXT,
            password_hash       TEXT,
            security_code_hash  TEXT,
            created_at          TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS highlights (
            id              INTEGER PRIMARY KEY,
            user_id         INTEGER NOT NULL REFERENCES users(id),
            highlight_text  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_highlights_user
            ON highlights(user_id);

        CREATE TABLE IF NOT EXISTS sections (
            id              INTEGER PRIMARY KEY,
            user_id         INTEGER NOT NULL REFERENCES users(id),
            name            TEXT NOT NULL,
            icon            TEXT,
            section_order   INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_sections_user
            ON sections(user_id, section_order);

        CREATE TABLE IF NOT EXISTS section_items (
            id          INTEGER PRIMARY KEY,
            section_id  INTEGER NOT NULL REFERENCES sections(id),
            title       TEXT,
            icon        TEXT,
            description TEXT,
            file_path   TEXT,
            file_type   TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_section_items_section
            ON section_items(section_id);

        CREATE TABLE IF NOT EXISTS memories (
            id              INTEGER PRIMARY KEY,
            user_id         INTEGER NOT NULL REFERENCES users(id),
            file_path       TEXT NOT NULL,
            file_type       TEXT NOT NULL,
            original_name   TEXT,
            caption         TEXT NOT NULL DEFAULT '',
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_memories_user
            ON memories(user_id, created_at);

        -- One table for the fixed-category entries (hobbies, projects, skills,
        -- certificates, achievements, adventures), keyed by category.
        CREATE TABLE IF NOT EXISTS content_items (
            id          INTEGER PRIMARY KEY,
            user_id     INTEGER NOT NULL REFERENCES users(id),
            category    TEXT NOT NULL,
            title       TEXT,
            icon        TEXT,
            color       TEXT,
            description TEXT,
            file_path   TEXT,
            file_type   TEXT,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_content_items_user
            ON content_items(user_id, category);

        -- Seed the default tenant that legacy compatibility mode falls back to.
        INSERT OR IGNORE INTO users (id, profile_id, username, name, intro_text)
            VALUES (1, 'default00000', 'default', 'Default', '');
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
