//! Reference documentation of the music-streaming database behind the query
//! service, shown in the console's optional schema panel.
//!
//! This is a hand-maintained copy and is never checked against a live schema.

/// One documented column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSchema {
    pub name: &'static str,
    pub data_type: &'static str,
    /// Free-form constraint text, empty when unconstrained.
    pub constraints: &'static str,
}

/// One documented table and its columns in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [ColumnSchema],
}

const fn col(
    name: &'static str,
    data_type: &'static str,
    constraints: &'static str,
) -> ColumnSchema {
    ColumnSchema {
        name,
        data_type,
        constraints,
    }
}

/// Every documented table, in panel order.
pub const TABLES: &[TableSchema] = &[
    TableSchema {
        name: "albums",
        columns: &[
            col("album_id", "VARCHAR(50)", "PRIMARY KEY"),
            col("name", "VARCHAR(255)", "NOT NULL"),
            col("album_type", "VARCHAR(20)", ""),
            col("release_date", "DATE", ""),
            col("total_tracks", "INTEGER", ""),
            col("label", "VARCHAR(255)", ""),
            col("popularity", "INTEGER", "CHECK (popularity BETWEEN 0 AND 100)"),
        ],
    },
    TableSchema {
        name: "tracks",
        columns: &[
            col("track_id", "VARCHAR(50)", "PRIMARY KEY"),
            col("name", "VARCHAR(255)", "NOT NULL"),
            col("album_id", "VARCHAR(50)", "REFERENCES albums(album_id)"),
            col("duration_ms", "INTEGER", ""),
            col("explicit", "BOOLEAN", ""),
            col("track_number", "INTEGER", ""),
            col("popularity", "INTEGER", "CHECK (popularity BETWEEN 0 AND 100)"),
        ],
    },
    TableSchema {
        name: "artists",
        columns: &[
            col("artist_id", "VARCHAR(50)", "PRIMARY KEY"),
            col("name", "VARCHAR(255)", "NOT NULL"),
            col("popularity", "INTEGER", "CHECK (popularity BETWEEN 0 AND 100)"),
            col("followers", "INTEGER", ""),
        ],
    },
    TableSchema {
        name: "genres",
        columns: &[
            col("genre_id", "SERIAL", "PRIMARY KEY"),
            col("name", "VARCHAR(100)", "UNIQUE NOT NULL"),
        ],
    },
    TableSchema {
        name: "artist_genres",
        columns: &[
            col(
                "artist_id",
                "VARCHAR(50)",
                "REFERENCES artists(artist_id), PRIMARY KEY (artist_id, genre_id)",
            ),
            col("genre_id", "INTEGER", "REFERENCES genres(genre_id)"),
        ],
    },
    TableSchema {
        name: "album_artists",
        columns: &[
            col(
                "album_id",
                "VARCHAR(50)",
                "REFERENCES albums(album_id), PRIMARY KEY (album_id, artist_id)",
            ),
            col("artist_id", "VARCHAR(50)", "REFERENCES artists(artist_id)"),
        ],
    },
    TableSchema {
        name: "track_artists",
        columns: &[
            col(
                "track_id",
                "VARCHAR(50)",
                "REFERENCES tracks(track_id), PRIMARY KEY (track_id, artist_id)",
            ),
            col("artist_id", "VARCHAR(50)", "REFERENCES artists(artist_id)"),
        ],
    },
    TableSchema {
        name: "audio_features",
        columns: &[
            col("track_id", "VARCHAR(50)", "PRIMARY KEY, REFERENCES tracks(track_id)"),
            col("danceability", "FLOAT", ""),
            col("energy", "FLOAT", ""),
            col("key", "INTEGER", ""),
            col("loudness", "FLOAT", ""),
            col("mode", "INTEGER", ""),
            col("speechiness", "FLOAT", ""),
            col("acousticness", "FLOAT", ""),
            col("instrumentalness", "FLOAT", ""),
            col("liveness", "FLOAT", ""),
            col("valence", "FLOAT", ""),
            col("tempo", "FLOAT", ""),
            col("time_signature", "INTEGER", ""),
        ],
    },
];

/// Looks a table up by exact name.
pub fn table(name: &str) -> Option<&'static TableSchema> {
    TABLES.iter().find(|table| table.name == name)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn documents_all_eight_tables_in_order() {
        let names: Vec<_> = TABLES.iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            [
                "albums",
                "tracks",
                "artists",
                "genres",
                "artist_genres",
                "album_artists",
                "track_artists",
                "audio_features",
            ]
        );
    }

    #[test]
    fn every_table_has_unique_nonempty_columns() {
        for table in TABLES {
            assert!(!table.columns.is_empty(), "{} has no columns", table.name);
            let unique: HashSet<_> = table.columns.iter().map(|c| c.name).collect();
            assert_eq!(unique.len(), table.columns.len(), "{} repeats a column", table.name);
            assert!(table.columns.iter().all(|c| !c.data_type.is_empty()));
        }
    }

    #[test]
    fn lookup_by_name() {
        let artists = table("artists").unwrap();
        let columns: Vec<_> = artists.columns.iter().map(|c| c.name).collect();
        assert_eq!(columns, ["artist_id", "name", "popularity", "followers"]);
        assert!(table("nosuchtable").is_none());
    }

    #[test]
    fn references_point_at_documented_tables() {
        for table in TABLES {
            for column in table.columns {
                if let Some(rest) = column.constraints.split("REFERENCES ").nth(1) {
                    let target = rest.split('(').next().unwrap_or_default();
                    assert!(
                        super::table(target).is_some(),
                        "{}.{} references unknown table {target}",
                        table.name,
                        column.name
                    );
                }
            }
        }
    }
}
