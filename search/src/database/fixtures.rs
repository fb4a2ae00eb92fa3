use super::types::Database;
use crate::error::SearchError;
use tracing::info;

/// A demo photo row. Optional flags keep the table below readable.
struct PhotoRow {
    uid: &'static str,
    title: &'static str,
    path: &'static str,
    name: &'static str,
    private: bool,
    favorite: bool,
    country: &'static str,
    state: &'static str,
    date: (i64, i64, i64),
    category: &'static str,
    lat_lng: (f64, f64),
    deleted: bool,
}

#[allow(clippy::too_many_arguments)]
const fn photo(
    uid: &'static str,
    title: &'static str,
    path: &'static str,
    name: &'static str,
    country: &'static str,
    state: &'static str,
    date: (i64, i64, i64),
    category: &'static str,
    lat_lng: (f64, f64),
) -> PhotoRow {
    PhotoRow {
        uid,
        title,
        path,
        name,
        private: false,
        favorite: false,
        country,
        state,
        date,
        category,
        lat_lng,
        deleted: false,
    }
}

struct AlbumRow {
    uid: &'static str,
    slug: &'static str,
    kind: &'static str,
    title: &'static str,
    path: &'static str,
    filter: &'static str,
    private: bool,
    /// (photo uid, hidden)
    members: &'static [(&'static str, bool)],
}

// No title here contains `%`, `_`, `&`, `'`, `*` or `|`. Several titles do
// match those characters as wildcards when they are not escaped.
const PHOTOS: &[PhotoRow] = &[
    PhotoRow {
        favorite: true,
        ..photo(
            "pt01",
            "Golden gold",
            "2016/06",
            "IMG_0001.jpg",
            "at",
            "Salzburg",
            (2016, 6, 12),
            "nature",
            (47.8095, 13.0550),
        )
    },
    photo(
        "pt02",
        "wholesale deals",
        "2018/11",
        "IMG_0002.jpg",
        "de",
        "Berlin",
        (2018, 11, 23),
        "shopping",
        (52.5200, 13.4050),
    ),
    photo(
        "pt03",
        "I love my dog",
        "2019/03",
        "dog.png",
        "us",
        "California",
        (2019, 3, 4),
        "animals",
        (37.7749, -122.4194),
    ),
    photo(
        "pt04",
        "Pets and Dogs",
        "2019/03",
        "pets.png",
        "us",
        "California",
        (2019, 3, 9),
        "animals",
        (37.8044, -122.2712),
    ),
    photo(
        "pt05",
        "Family Reunion",
        "2017/08",
        "family.jpg",
        "gb",
        "England",
        (2017, 8, 5),
        "people",
        (51.5072, -0.1276),
    ),
    PhotoRow {
        favorite: true,
        ..photo(
            "pt06",
            "Golden Retriever Puppies",
            "2020/05",
            "puppies.heic",
            "ca",
            "Ontario",
            (2020, 5, 17),
            "animals",
            (43.6532, -79.3832),
        )
    },
    photo(
        "pt07",
        "Blue Shirt",
        "2021/02",
        "shirt.jpg",
        "fr",
        "Ile-de-France",
        (2021, 2, 14),
        "shopping",
        (48.8566, 2.3522),
    ),
    photo(
        "pt08",
        "Route to Lake Como",
        "2015/09",
        "como.jpg",
        "it",
        "Lombardy",
        (2015, 9, 10),
        "travel",
        (45.9810, 9.2572),
    ),
    photo(
        "pt09",
        "Spring Walk",
        "1990/04",
        "scan-01.tif",
        "de",
        "Bavaria",
        (1990, 4, 2),
        "nature",
        (48.1351, 11.5820),
    ),
    photo(
        "pt10",
        "Cherry Blossoms",
        "1990/04",
        "scan-02.tif",
        "de",
        "Bavaria",
        (1990, 4, 8),
        "nature",
        (48.1351, 11.5820),
    ),
    photo(
        "pt11",
        "Easter Market",
        "1990/04",
        "scan-03.tif",
        "de",
        "Bavaria",
        (1990, 4, 15),
        "people",
        (48.1351, 11.5820),
    ),
    photo(
        "pt12",
        "Rainy Afternoon",
        "1990/04",
        "scan-04.tif",
        "de",
        "Bavaria",
        (1990, 4, 21),
        "nature",
        (48.1351, 11.5820),
    ),
    PhotoRow {
        private: true,
        ..photo(
            "pt13",
            "Private Diary",
            "1990/04",
            "scan-05.tif",
            "de",
            "Bavaria",
            (1990, 4, 25),
            "people",
            (48.1351, 11.5820),
        )
    },
    PhotoRow {
        deleted: true,
        ..photo(
            "pt14",
            "Lost Negative",
            "1990/04",
            "scan-06.tif",
            "de",
            "Bavaria",
            (1990, 4, 28),
            "nature",
            (48.1351, 11.5820),
        )
    },
    photo(
        "pt15",
        "Vienna Opera",
        "2016/08",
        "opera.jpg",
        "at",
        "Vienna",
        (2016, 8, 1),
        "culture",
        (48.2030, 16.3690),
    ),
    PhotoRow {
        private: true,
        ..photo(
            "pt16",
            "Hidden Vienna",
            "2016/08",
            "hidden.jpg",
            "at",
            "Vienna",
            (2016, 8, 2),
            "culture",
            (48.2082, 16.3738),
        )
    },
];

const ALBUMS: &[AlbumRow] = &[
    AlbumRow {
        uid: "as01",
        slug: "april-1990",
        kind: "folder",
        title: "April 1990",
        path: "1990/04",
        filter: "path:\"1990/04\" public:true",
        private: false,
        members: &[
            ("pt09", false),
            ("pt10", false),
            ("pt11", false),
            ("pt12", false),
            ("pt13", false),
            ("pt14", false),
        ],
    },
    AlbumRow {
        uid: "as02",
        slug: "austria-2016",
        kind: "moment",
        title: "Austria 2016",
        path: "",
        filter: "public:true country:at year:2016",
        private: false,
        members: &[],
    },
    AlbumRow {
        uid: "as03",
        slug: "best-friends",
        kind: "album",
        title: "Best Friends",
        path: "",
        filter: "",
        private: false,
        members: &[("pt03", false), ("pt04", false), ("pt06", true)],
    },
    AlbumRow {
        uid: "as04",
        slug: "secret-gold",
        kind: "album",
        title: "Secret Gold",
        path: "",
        filter: "",
        private: true,
        members: &[("pt02", false)],
    },
];

impl Database {
    /// Loads the demo photos and albums in one transaction.
    pub async fn insert_fixtures(&self) -> Result<(), SearchError> {
        let mut tx = self.pool.begin().await?;

        for p in PHOTOS {
            let (year, month, day) = p.date;
            let taken_at = format!("{:04}-{:02}-{:02}T12:00:00Z", year, month, day);
            let deleted_at = p.deleted.then_some("2020-01-01T00:00:00Z");
            sqlx::query(
                "INSERT INTO photos (photo_uid, photo_title, photo_path, photo_name, photo_private, photo_favorite, photo_country, place_state, photo_year, photo_month, photo_day, photo_category, photo_lat, photo_lng, taken_at, deleted_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(p.uid)
            .bind(p.title)
            .bind(p.path)
            .bind(p.name)
            .bind(p.private)
            .bind(p.favorite)
            .bind(p.country)
            .bind(p.state)
            .bind(year)
            .bind(month)
            .bind(day)
            .bind(p.category)
            .bind(p.lat_lng.0)
            .bind(p.lat_lng.1)
            .bind(taken_at)
            .bind(deleted_at)
            .execute(&mut *tx)
            .await?;
        }

        for a in ALBUMS {
            sqlx::query(
                "INSERT INTO albums (album_uid, album_slug, album_type, album_title, album_path, album_filter, album_private)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(a.uid)
            .bind(a.slug)
            .bind(a.kind)
            .bind(a.title)
            .bind(a.path)
            .bind(a.filter)
            .bind(a.private)
            .execute(&mut *tx)
            .await?;

            for (photo_uid, hidden) in a.members {
                sqlx::query(
                    "INSERT INTO photos_albums (photo_id, album_id, hidden)
                     SELECT p.id, a.id, ? FROM photos p, albums a WHERE p.photo_uid = ? AND a.album_uid = ?",
                )
                .bind(*hidden)
                .bind(*photo_uid)
                .bind(a.uid)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        info!(
            photos = PHOTOS.len(),
            albums = ALBUMS.len(),
            "Loaded demo fixtures"
        );
        Ok(())
    }
}
