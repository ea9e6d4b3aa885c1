use crate::Database;
use crate::models::{ContentItemRow, HighlightRow, MemoryRow, SectionItemRow, SectionRow, UserRow};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};

impl Database {
    // -- Users --

    pub fn create_user(
        &self,
        profile_id: &str,
        username: &str,
        name: &str,
        intro_text: &str,
    ) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO users (profile_id, username, name, intro_text) VALUES (?1, ?2, ?3, ?4)",
                params![profile_id, username, name, intro_text],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Tenant lookup: opaque profile id to internal numeric user id.
    pub fn user_id_for_profile(&self, profile_id: &str) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            let id = conn
                .query_row(
                    "SELECT id FROM users WHERE profile_id = ?1",
                    [profile_id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(id)
        })
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id = ?1", params![id]))
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username = ?1", params![username]))
    }

    pub fn get_user_by_profile_id(&self, profile_id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "profile_id = ?1", params![profile_id]))
    }

    pub fn username_taken(&self, username: &str, exclude_user: Option<i64>) -> Result<bool> {
        self.with_conn(|conn| {
            let existing: Option<i64> = match exclude_user {
                Some(id) => conn
                    .query_row(
                        "SELECT id FROM users WHERE username = ?1 AND id != ?2",
                        params![username, id],
                        |row| row.get(0),
                    )
                    .optional()?,
                None => conn
                    .query_row(
                        "SELECT id FROM users WHERE username = ?1",
                        [username],
                        |row| row.get(0),
                    )
                    .optional()?,
            };
            Ok(existing.is_some())
        })
    }

    pub fn set_password_hash(&self, user_id: i64, hash: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "UPDATE users SET password_hash = ?1 WHERE id = ?2",
                params![hash, user_id],
            )?;
            Ok(())
        })
    }

    pub fn set_password_hash_for_username(&self, username: &str, hash: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "UPDATE users SET password_hash = ?1 WHERE username = ?2",
                params![hash, username],
            )?;
            Ok(())
        })
    }

    pub fn set_security_code_hash(&self, user_id: i64, hash: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "UPDATE users SET security_code_hash = ?1 WHERE id = ?2",
                params![hash, user_id],
            )?;
            Ok(())
        })
    }

    pub fn current_profile_picture(&self, user_id: i64) -> Result<Option<String>> {
        self.with_conn(|conn| {
            let url: Option<Option<String>> = conn
                .query_row(
                    "SELECT profile_picture FROM users WHERE id = ?1",
                    [user_id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(url.flatten())
        })
    }

    pub fn set_profile_picture(&self, user_id: i64, url: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "UPDATE users SET profile_picture = ?1 WHERE id = ?2",
                params![url, user_id],
            )?;
            Ok(())
        })
    }

    pub fn current_cover_image(&self, user_id: i64) -> Result<Option<String>> {
        self.with_conn(|conn| {
            let url: Option<Option<String>> = conn
                .query_row(
                    "SELECT cover_image FROM users WHERE id = ?1",
                    [user_id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(url.flatten())
        })
    }

    pub fn set_cover_image(&self, user_id: i64, url: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "UPDATE users SET cover_image = ?1 WHERE id = ?2",
                params![url, user_id],
            )?;
            Ok(())
        })
    }

    /// Partial update of the user's text fields; absent fields stay untouched.
    pub fn update_user_fields(
        &self,
        user_id: i64,
        name: Option<&str>,
        username: Option<&str>,
        intro_text: Option<&str>,
    ) -> Result<()> {
        let mut sets: Vec<&str> = Vec::new();
        let mut vals: Vec<String> = Vec::new();
        if let Some(v) = name {
            sets.push("name = ?");
            vals.push(v.to_string());
        }
        if let Some(v) = username {
            sets.push("username = ?");
            vals.push(v.to_string());
        }
        if let Some(v) = intro_text {
            sets.push("intro_text = ?");
            vals.push(v.to_string());
        }
        if sets.is_empty() {
            return Ok(());
        }

        let sql = format!("UPDATE users SET {} WHERE id = ?", sets.join(", "));
        self.with_conn_mut(|conn| {
            let mut sql_params: Vec<&dyn rusqlite::types::ToSql> =
                vals.iter().map(|v| v as &dyn rusqlite::types::ToSql).collect();
            sql_params.push(&user_id);
            conn.execute(&sql, sql_params.as_slice())?;
            Ok(())
        })
    }

    // -- Highlights --

    pub fn add_highlight(&self, user_id: i64, text: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO highlights (user_id, highlight_text) VALUES (?1, ?2)",
                params![user_id, text],
            )?;
            Ok(())
        })
    }

    /// Full replace: the existing set is deleted and re-inserted, not diffed.
    pub fn replace_highlights(&self, user_id: i64, texts: &[String]) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute("DELETE FROM highlights WHERE user_id = ?1", [user_id])?;
            for text in texts {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    continue;
                }
                conn.execute(
                    "INSERT INTO highlights (user_id, highlight_text) VALUES (?1, ?2)",
                    params![user_id, trimmed],
                )?;
            }
            Ok(())
        })
    }

    pub fn highlights_for_user(&self, user_id: i64) -> Result<Vec<HighlightRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, highlight_text FROM highlights WHERE user_id = ?1 ORDER BY id",
            )?;
            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(HighlightRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        highlight_text: row.get(2)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Sections --

    pub fn create_section(&self, user_id: i64, name: &str, icon: Option<&str>) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO sections (user_id, name, icon) VALUES (?1, ?2, ?3)",
                params![user_id, name, icon],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn sections_for_user(&self, user_id: i64) -> Result<Vec<SectionRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, name, icon, section_order FROM sections
                 WHERE user_id = ?1 ORDER BY section_order, id",
            )?;
            let rows = stmt
                .query_map([user_id], map_section)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn section_exists(&self, section_id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let id: Option<i64> = conn
                .query_row("SELECT id FROM sections WHERE id = ?1", [section_id], |row| {
                    row.get(0)
                })
                .optional()?;
            Ok(id.is_some())
        })
    }

    /// Returns the number of rows updated; zero means the section does not
    /// exist or belongs to another user.
    pub fn update_section(
        &self,
        section_id: i64,
        user_id: i64,
        name: &str,
        icon: Option<&str>,
    ) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute(
                "UPDATE sections SET name = ?1, icon = ?2 WHERE id = ?3 AND user_id = ?4",
                params![name, icon, section_id, user_id],
            )?;
            Ok(n)
        })
    }

    pub fn delete_section(&self, section_id: i64) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute("DELETE FROM sections WHERE id = ?1", [section_id])?;
            Ok(n)
        })
    }

    pub fn items_for_section(&self, section_id: i64) -> Result<Vec<SectionItemRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, section_id, title, icon, description, file_path, file_type
                 FROM section_items WHERE section_id = ?1 ORDER BY id",
            )?;
            let rows = stmt
                .query_map([section_id], map_section_item)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn delete_items_for_section(&self, section_id: i64) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute(
                "DELETE FROM section_items WHERE section_id = ?1",
                [section_id],
            )?;
            Ok(n)
        })
    }

    pub fn insert_section_item(
        &self,
        section_id: i64,
        title: Option<&str>,
        icon: Option<&str>,
        description: Option<&str>,
        file: Option<(&str, &str)>,
    ) -> Result<i64> {
        self.with_conn_mut(|conn| {
            let (file_path, file_type) = match file {
                Some((path, kind)) => (Some(path), Some(kind)),
                None => (None, None),
            };
            conn.execute(
                "INSERT INTO section_items (section_id, title, icon, description, file_path, file_type)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![section_id, title, icon, description, file_path, file_type],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_section_item(&self, item_id: i64) -> Result<Option<SectionItemRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, section_id, title, icon, description, file_path, file_type
                     FROM section_items WHERE id = ?1",
                    [item_id],
                    map_section_item,
                )
                .optional()?;
            Ok(row)
        })
    }

    /// When `file` is None the attachment pair is left untouched.
    pub fn update_section_item(
        &self,
        item_id: i64,
        title: Option<&str>,
        icon: Option<&str>,
        description: Option<&str>,
        file: Option<(&str, &str)>,
    ) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = match file {
                Some((path, kind)) => conn.execute(
                    "UPDATE section_items SET title = ?1, icon = ?2, description = ?3,
                     file_path = ?4, file_type = ?5 WHERE id = ?6",
                    params![title, icon, description, path, kind, item_id],
                )?,
                None => conn.execute(
                    "UPDATE section_items SET title = ?1, icon = ?2, description = ?3 WHERE id = ?4",
                    params![title, icon, description, item_id],
                )?,
            };
            Ok(n)
        })
    }

    pub fn delete_section_item(&self, item_id: i64) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute("DELETE FROM section_items WHERE id = ?1", [item_id])?;
            Ok(n)
        })
    }

    // -- Memories --

    pub fn insert_memory(
        &self,
        user_id: i64,
        file_path: &str,
        file_type: &str,
        original_name: &str,
        caption: &str,
    ) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO memories (user_id, file_path, file_type, original_name, caption)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![user_id, file_path, file_type, original_name, caption],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn memories_for_user(&self, user_id: i64) -> Result<Vec<MemoryRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, file_path, file_type, original_name, caption, created_at
                 FROM memories WHERE user_id = ?1 ORDER BY created_at DESC, id DESC",
            )?;
            let rows = stmt
                .query_map([user_id], map_memory)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_memory(&self, memory_id: i64, user_id: i64) -> Result<Option<MemoryRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, user_id, file_path, file_type, original_name, caption, created_at
                     FROM memories WHERE id = ?1 AND user_id = ?2",
                    params![memory_id, user_id],
                    map_memory,
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn delete_memory(&self, memory_id: i64, user_id: i64) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute(
                "DELETE FROM memories WHERE id = ?1 AND user_id = ?2",
                params![memory_id, user_id],
            )?;
            Ok(n)
        })
    }

    // -- Fixed-category content --

    pub fn insert_content_item(
        &self,
        user_id: i64,
        category: &str,
        title: Option<&str>,
        icon: Option<&str>,
        color: Option<&str>,
        description: Option<&str>,
        file: Option<(&str, &str)>,
    ) -> Result<i64> {
        self.with_conn_mut(|conn| {
            let (file_path, file_type) = match file {
                Some((path, kind)) => (Some(path), Some(kind)),
                None => (None, None),
            };
            conn.execute(
                "INSERT INTO content_items (user_id, category, title, icon, color, description, file_path, file_type)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![user_id, category, title, icon, color, description, file_path, file_type],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_content_item(
        &self,
        item_id: i64,
        category: &str,
        user_id: i64,
    ) -> Result<Option<ContentItemRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, user_id, category, title, icon, color, description, file_path, file_type, created_at
                     FROM content_items WHERE id = ?1 AND category = ?2 AND user_id = ?3",
                    params![item_id, category, user_id],
                    map_content_item,
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn update_content_item(
        &self,
        item_id: i64,
        category: &str,
        user_id: i64,
        title: Option<&str>,
        icon: Option<&str>,
        color: Option<&str>,
        description: Option<&str>,
        file: Option<(&str, &str)>,
    ) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = match file {
                Some((path, kind)) => conn.execute(
                    "UPDATE content_items SET title = ?1, icon = ?2, color = ?3, description = ?4,
                     file_path = ?5, file_type = ?6 WHERE id = ?7 AND category = ?8 AND user_id = ?9",
                    params![title, icon, color, description, path, kind, item_id, category, user_id],
                )?,
                None => conn.execute(
                    "UPDATE content_items SET title = ?1, icon = ?2, color = ?3, description = ?4
                     WHERE id = ?5 AND category = ?6 AND user_id = ?7",
                    params![title, icon, color, description, item_id, category, user_id],
                )?,
            };
            Ok(n)
        })
    }

    pub fn delete_content_item(&self, item_id: i64, category: &str, user_id: i64) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute(
                "DELETE FROM content_items WHERE id = ?1 AND category = ?2 AND user_id = ?3",
                params![item_id, category, user_id],
            )?;
            Ok(n)
        })
    }
}

fn query_user(
    conn: &Connection,
    predicate: &str,
    sql_params: impl rusqlite::Params,
) -> Result<Option<UserRow>> {
    let sql = format!(
        "SELECT id, profile_id, username, name, intro_text, profile_picture, cover_image,
                password_hash, security_code_hash, created_at
         FROM users WHERE {}",
        predicate
    );
    let row = conn
        .query_row(&sql, sql_params, |row| {
            Ok(UserRow {
                id: row.get(0)?,
                profile_id: row.get(1)?,
                username: row.get(2)?,
                name: row.get(3)?,
                intro_text: row.get(4)?,
                profile_picture: row.get(5)?,
                cover_image: row.get(6)?,
                password_hash: row.get(7)?,
                security_code_hash: row.get(8)?,
                created_at: row.get(9)?,
            })
        })
        .optional()?;
    Ok(row)
}

fn map_section(row: &Row<'_>) -> rusqlite::Result<SectionRow> {
    Ok(SectionRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        icon: row.get(3)?,
        section_order: row.get(4)?,
    })
}

fn map_section_item(row: &Row<'_>) -> rusqlite::Result<SectionItemRow> {
    Ok(SectionItemRow {
        id: row.get(0)?,
        section_id: row.get(1)?,
        title: row.get(2)?,
        icon: row.get(3)?,
        description: row.get(4)?,
        file_path: row.get(5)?,
        file_type: row.get(6)?,
    })
}

fn map_memory(row: &Row<'_>) -> rusqlite::Result<MemoryRow> {
    Ok(MemoryRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        file_path: row.get(2)?,
        file_type: row.get(3)?,
        original_name: row.get(4)?,
        caption: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn map_content_item(row: &Row<'_>) -> rusqlite::Result<ContentItemRow> {
    Ok(ContentItemRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category: row.get(2)?,
        title: row.get(3)?,
        icon: row.get(4)?,
        color: row.get(5)?,
        description: row.get(6)?,
        file_path: row.get(7)?,
        file_type: row.get(8)?,
        created_at: row.get(9)?,
    })
}
