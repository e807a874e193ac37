use chrono::Utc;
use rusqlite::{params, Row};

use recall_core::image::{filename_from_description, CreateImage, Image, ImageMatch};

use crate::{Db, DbError};

fn row_to_image(row: &Row) -> rusqlite::Result<Image> {
    Ok(Image {
        id: row.get("id")?,
        description: row.get("description")?,
        filename: row.get("filename")?,
        name: row.get("name")?,
        relation: row.get("relation")?,
        created_at: row.get("created_at")?,
    })
}

impl Db {
    /// Insert one image row. Duplicate descriptions are accepted; each
    /// call produces a new row.
    pub fn store_image(&self, input: &CreateImage) -> Result<Image, DbError> {
        self.with_conn(|conn| {
            let id = uuid::Uuid::new_v4().to_string();
            let now = Utc::now();
            let filename = filename_from_description(&input.description);
            conn.execute(
                "INSERT INTO images (id, description, image_data, filename, name, relation, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    id,
                    input.description,
                    input.image_data,
                    filename,
                    input.name,
                    input.relation,
                    now
                ],
            )?;
            tracing::info!(description = %input.description, "stored image");
            conn.query_row(
                "SELECT id, description, filename, name, relation, created_at
                 FROM images WHERE id = ?1",
                params![id],
                row_to_image,
            )
            .map_err(DbError::from)
        })
    }

    /// Scan every stored image and return the first whose bytes equal the
    /// candidate exactly. Insertion order, so the earliest duplicate wins.
    pub fn match_image(&self, candidate: &[u8]) -> Result<Option<ImageMatch>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT name, relation, description, image_data FROM images ORDER BY rowid",
            )?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let stored: Vec<u8> = row.get("image_data")?;
                if stored == candidate {
                    tracing::info!("found matching image");
                    return Ok(Some(ImageMatch {
                        name: row.get("name")?,
                        relation: row.get("relation")?,
                        description: row.get("description")?,
                    }));
                }
            }
            Ok(None)
        })
    }

    pub fn list_images(&self) -> Result<Vec<Image>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, description, filename, name, relation, created_at
                 FROM images ORDER BY rowid",
            )?;
            let images = stmt
                .query_map([], row_to_image)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(images)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(description: &str, data: &[u8]) -> CreateImage {
        CreateImage {
            description: description.into(),
            name: "Alice".into(),
            relation: "daughter".into(),
            image_data: data.to_vec(),
        }
    }

    #[test]
    fn store_derives_filename_from_description() {
        let db = Db::open_in_memory().unwrap();
        let image = db.store_image(&create("my best friend", b"bytes")).unwrap();
        assert_eq!(image.filename, "my_best_friend.jpg");
        assert_eq!(image.name, "Alice");
        assert_eq!(image.relation, "daughter");
    }

    #[test]
    fn stored_bytes_match_exactly() {
        let db = Db::open_in_memory().unwrap();
        db.store_image(&create("grandma", b"\x00\x01\x02jpeg-bytes")).unwrap();

        let matched = db.match_image(b"\x00\x01\x02jpeg-bytes").unwrap().unwrap();
        assert_eq!(
            matched,
            ImageMatch {
                name: "Alice".into(),
                relation: "daughter".into(),
                description: "grandma".into(),
            }
        );
    }

    #[test]
    fn single_byte_difference_is_no_match() {
        let db = Db::open_in_memory().unwrap();
        db.store_image(&create("grandma", b"\x00\x01\x02jpeg-bytes")).unwrap();

        assert!(db.match_image(b"\x00\x01\x03jpeg-bytes").unwrap().is_none());
    }

    #[test]
    fn first_stored_duplicate_wins() {
        let db = Db::open_in_memory().unwrap();
        let mut first = create("first copy", b"same-bytes");
        first.name = "Bob".into();
        db.store_image(&first).unwrap();
        db.store_image(&create("second copy", b"same-bytes")).unwrap();

        let matched = db.match_image(b"same-bytes").unwrap().unwrap();
        assert_eq!(matched.name, "Bob");
        assert_eq!(matched.description, "first copy");
    }

    #[test]
    fn duplicate_descriptions_create_separate_rows() {
        let db = Db::open_in_memory().unwrap();
        db.store_image(&create("grandma", b"one")).unwrap();
        db.store_image(&create("grandma", b"two")).unwrap();

        assert_eq!(db.list_images().unwrap().len(), 2);
    }

    #[test]
    fn match_on_empty_store_is_none() {
        let db = Db::open_in_memory().unwrap();
        assert!(db.match_image(b"anything").unwrap().is_none());
    }
}
