//! Persistence sink for the star schema.
//!
//! Extractors only see the [`Warehouse`] trait. [`DieselWarehouse`] implements it
//! over a single long-lived diesel connection: SQLite always, PostgreSQL with the
//! `postgres` feature. Every write is an upsert keyed on the table's primary key, so
//! re-running a batch over the same files leaves the tables unchanged:
//! - songs, artists, time, songplays: `ON CONFLICT DO NOTHING`
//! - users: `ON CONFLICT (user_id) DO UPDATE SET level`
//!
//! The unit of work is driven explicitly with [`Warehouse::begin`],
//! [`Warehouse::commit`] and [`Warehouse::rollback`].

use diesel::connection::{AnsiTransactionManager, SimpleConnection, TransactionManager};
use diesel::prelude::*;
use diesel::{SqliteConnection, insert_into};

use crate::db::connection::{self, DatabaseUrl};
use crate::db::tables;
use crate::errors::EtlResult;
use crate::models::{Artist, Song, SongMatch, Songplay, TimeRow, User};
use crate::schema::{artists, songplays, songs, time, users};

/// Write and lookup operations the extractors need.
pub trait Warehouse {
    /// Insert a song; an existing `song_id` is left untouched.
    fn upsert_song(&mut self, song: &Song) -> EtlResult<()>;

    /// Insert an artist; an existing `artist_id` is left untouched.
    fn upsert_artist(&mut self, artist: &Artist) -> EtlResult<()>;

    /// Insert a time row; an existing `start_time` is left untouched.
    fn upsert_time(&mut self, row: &TimeRow) -> EtlResult<()>;

    /// Insert a user, or overwrite the stored `level` if `user_id` exists.
    fn upsert_user(&mut self, user: &User) -> EtlResult<()>;

    /// Insert a fact row; a row with the same key is left untouched.
    fn insert_songplay(&mut self, play: &Songplay) -> EtlResult<()>;

    /// Find the song and artist matching a title, artist name and exact duration.
    fn find_song(
        &mut self,
        title: &str,
        artist_name: &str,
        duration: f64,
    ) -> EtlResult<Option<SongMatch>>;

    /// Open a unit of work.
    fn begin(&mut self) -> EtlResult<()>;

    /// Make everything written since [`Warehouse::begin`] durable.
    fn commit(&mut self) -> EtlResult<()>;

    /// Discard everything written since [`Warehouse::begin`].
    fn rollback(&mut self) -> EtlResult<()>;
}

/// [`Warehouse`] backed by one diesel connection.
pub struct DieselWarehouse<C> {
    conn: C,
}

impl<C: SimpleConnection> DieselWarehouse<C> {
    /// Wrap an open connection.
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    /// Borrow the underlying connection, e.g. for ad-hoc queries.
    pub fn connection(&mut self) -> &mut C {
        &mut self.conn
    }

    /// Release the underlying connection.
    pub fn into_inner(self) -> C {
        self.conn
    }

    /// Create any missing star-schema table.
    pub fn create_tables(&mut self) -> EtlResult<()> {
        tables::create_tables(&mut self.conn)
    }

    /// Drop and recreate every star-schema table.
    pub fn reset_tables(&mut self) -> EtlResult<()> {
        tables::reset_tables(&mut self.conn)
    }
}

impl DieselWarehouse<SqliteConnection> {
    /// Open a SQLite warehouse at `path` with the usual PRAGMAs applied.
    pub fn open_sqlite(path: &str) -> EtlResult<Self> {
        Ok(Self::new(connection::connect_sqlite(path)?))
    }
}

#[cfg(feature = "postgres")]
impl DieselWarehouse<diesel::PgConnection> {
    /// Open a PostgreSQL warehouse.
    pub fn open_postgres(url: &str) -> EtlResult<Self> {
        Ok(Self::new(connection::connect_postgres(url)?))
    }
}

/// Open a warehouse for `database_url`, choosing the backend from its scheme.
///
/// When `create_tables` is set, missing tables are created before returning.
pub fn open(database_url: &str, create_tables: bool) -> EtlResult<Box<dyn Warehouse>> {
    match DatabaseUrl::parse(database_url) {
        DatabaseUrl::Sqlite(path) => {
            let mut wh = DieselWarehouse::open_sqlite(&path)?;
            if create_tables {
                wh.create_tables()?;
            }
            Ok(Box::new(wh))
        }
        #[cfg(feature = "postgres")]
        DatabaseUrl::Postgres(url) => {
            let mut wh = DieselWarehouse::open_postgres(&url)?;
            if create_tables {
                wh.create_tables()?;
            }
            Ok(Box::new(wh))
        }
        #[cfg(not(feature = "postgres"))]
        DatabaseUrl::Postgres(url) => Err(connection::postgres_unavailable(&url)),
    }
}

/// Open a warehouse and drop/recreate all tables.
pub fn open_reset(database_url: &str) -> EtlResult<()> {
    match DatabaseUrl::parse(database_url) {
        DatabaseUrl::Sqlite(path) => DieselWarehouse::open_sqlite(&path)?.reset_tables(),
        #[cfg(feature = "postgres")]
        DatabaseUrl::Postgres(url) => DieselWarehouse::open_postgres(&url)?.reset_tables(),
        #[cfg(not(feature = "postgres"))]
        DatabaseUrl::Postgres(url) => Err(connection::postgres_unavailable(&url)),
    }
}

// The query DSL is identical for both backends; only the connection type differs.
macro_rules! impl_diesel_warehouse {
    ($conn:ty) => {
        impl Warehouse for DieselWarehouse<$conn> {
            fn upsert_song(&mut self, song: &Song) -> EtlResult<()> {
                insert_into(songs::table)
                    .values(song)
                    .on_conflict(songs::song_id)
                    .do_nothing()
                    .execute(&mut self.conn)?;
                Ok(())
            }

            fn upsert_artist(&mut self, artist: &Artist) -> EtlResult<()> {
                insert_into(artists::table)
                    .values(artist)
                    .on_conflict(artists::artist_id)
                    .do_nothing()
                    .execute(&mut self.conn)?;
                Ok(())
            }

            fn upsert_time(&mut self, row: &TimeRow) -> EtlResult<()> {
                insert_into(time::table)
                    .values(row)
                    .on_conflict(time::start_time)
                    .do_nothing()
                    .execute(&mut self.conn)?;
                Ok(())
            }

            fn upsert_user(&mut self, user: &User) -> EtlResult<()> {
                insert_into(users::table)
                    .values(user)
                    .on_conflict(users::user_id)
                    .do_update()
                    .set(users::level.eq(&user.level))
                    .execute(&mut self.conn)?;
                Ok(())
            }

            fn insert_songplay(&mut self, play: &Songplay) -> EtlResult<()> {
                insert_into(songplays::table)
                    .values(play)
                    .on_conflict((
                        songplays::start_time,
                        songplays::user_id,
                        songplays::session_id,
                        songplays::songplay_id,
                    ))
                    .do_nothing()
                    .execute(&mut self.conn)?;
                Ok(())
            }

            fn find_song(
                &mut self,
                title: &str,
                artist_name: &str,
                duration: f64,
            ) -> EtlResult<Option<SongMatch>> {
                let found = songs::table
                    .inner_join(artists::table.on(songs::artist_id.eq(artists::artist_id)))
                    .filter(songs::title.eq(title))
                    .filter(artists::name.eq(artist_name))
                    .filter(songs::duration.eq(duration))
                    .select((songs::song_id, artists::artist_id))
                    .first::<SongMatch>(&mut self.conn)
                    .optional()?;
                Ok(found)
            }

            fn begin(&mut self) -> EtlResult<()> {
                AnsiTransactionManager::begin_transaction(&mut self.conn)?;
                Ok(())
            }

            fn commit(&mut self) -> EtlResult<()> {
                AnsiTransactionManager::commit_transaction(&mut self.conn)?;
                Ok(())
            }

            fn rollback(&mut self) -> EtlResult<()> {
                AnsiTransactionManager::rollback_transaction(&mut self.conn)?;
                Ok(())
            }
        }
    };
}

impl_diesel_warehouse!(SqliteConnection);
#[cfg(feature = "postgres")]
impl_diesel_warehouse!(diesel::PgConnection);

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;

    fn warehouse() -> (tempfile::TempDir, DieselWarehouse<SqliteConnection>) {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("wh.db");
        let mut wh = DieselWarehouse::open_sqlite(path.to_str().unwrap()).unwrap();
        wh.create_tables().unwrap();
        (dir, wh)
    }

    fn song(id: &str, title: &str, artist: &str, duration: f64) -> Song {
        Song {
            song_id: id.into(),
            title: title.into(),
            artist_id: artist.into(),
            year: 0,
            duration,
        }
    }

    fn artist(id: &str, name: &str) -> Artist {
        Artist {
            artist_id: id.into(),
            name: name.into(),
            location: None,
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn find_song_requires_title_artist_and_duration() {
        let (_dir, mut wh) = warehouse();
        wh.upsert_song(&song("S1", "Intro", "A1", 120.5)).unwrap();
        wh.upsert_artist(&artist("A1", "The XX")).unwrap();

        let hit = wh.find_song("Intro", "The XX", 120.5).unwrap();
        assert_eq!(
            hit,
            Some(SongMatch {
                song_id: "S1".into(),
                artist_id: "A1".into()
            })
        );

        assert_eq!(wh.find_song("Intro", "The XX", 121.0).unwrap(), None);
        assert_eq!(wh.find_song("Intro", "Someone", 120.5).unwrap(), None);
        assert_eq!(wh.find_song("Outro", "The XX", 120.5).unwrap(), None);
    }

    #[test]
    fn rollback_discards_the_unit_of_work() {
        let (_dir, mut wh) = warehouse();

        wh.begin().unwrap();
        wh.upsert_song(&song("S1", "Kept", "A1", 1.0)).unwrap();
        wh.commit().unwrap();

        wh.begin().unwrap();
        wh.upsert_song(&song("S2", "Dropped", "A1", 1.0)).unwrap();
        wh.rollback().unwrap();

        let ids: Vec<String> = songs::table
            .select(songs::song_id)
            .order(songs::song_id)
            .load(wh.connection())
            .unwrap();
        assert_eq!(ids, vec!["S1".to_string()]);
    }

    #[test]
    fn time_upsert_ignores_duplicates() {
        let (_dir, mut wh) = warehouse();
        let start_time = NaiveDate::from_ymd_opt(2018, 11, 3)
            .unwrap()
            .and_hms_milli_opt(1, 4, 33, 796)
            .unwrap();
        let row = TimeRow {
            start_time,
            hour: 1,
            day: 3,
            week: 44,
            month: 11,
            year: 2018,
            weekday: 5,
        };
        wh.upsert_time(&row).unwrap();
        wh.upsert_time(&row).unwrap();

        let stored: Vec<TimeRow> = time::table
            .select(TimeRow::as_select())
            .load(wh.connection())
            .unwrap();
        assert_eq!(stored, vec![row]);
    }
}
