use std::io::Write;
use std::path::Path;

use catalog_lens::data::loader::{load_dataset, load_file, load_merged};
use catalog_lens::data::model::{FieldValue, Status};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn trending_json_normalizes_to_content() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "movies.json",
        r#"[
            {"movie_id": 1, "title": "Dune 2", "release_year": 2025, "imdb_rating": 8.5,
             "total_collection_crore": 712.0, "status": "released", "platform": "Theatrical"},
            {"movie_id": 2, "title": "Elio", "release_year": 2026, "imdb_rating": null,
             "total_collection_crore": null, "status": "upcoming", "platform": "Disney+"}
        ]"#,
    );

    let ds = load_dataset(&path).unwrap();
    let content = ds.content().unwrap();
    assert_eq!(content.len(), 2);
    assert_eq!(content[0].id, "1");
    assert_eq!(content[1].status, Some(Status::Upcoming));
    assert_eq!(content[1].rating, None);
    assert_eq!(
        ds.options("platform"),
        vec![FieldValue::from("Disney+"), FieldValue::from("Theatrical")]
    );
}

#[test]
fn library_csv_reads_platform_flags() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "final.csv",
        "Title,Year,IMDb,Type,Netflix,Hulu,Prime Video,Disney+\n\
         Inception,2010,8.8/10,Movie,1,0,1,0\n\
         Dark,2017,,Series,1,0,0,0\n",
    );

    let ds = load_dataset(&path).unwrap();
    let content = ds.content().unwrap();
    assert_eq!(content[0].id, "final-0");
    assert_eq!(content[0].rating, Some(8.8));
    assert_eq!(content[0].content_type.as_deref(), Some("movie"));
    assert_eq!(content[0].platform_names().collect::<Vec<_>>(), ["Netflix", "Prime Video"]);
    assert_eq!(content[1].rating, None);
    assert_eq!(content[1].year, Some(2017));
}

#[test]
fn users_api_page_normalizes_to_users() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "users.json",
        r#"{"data": [
            {"_id": "a1", "username": "mira", "email": "m@example.com", "preferences": ["Hulu"]},
            {"_id": "a2", "username": "otto", "account_status": "Banned", "subscription_tier": "Premium"}
        ], "total": 2, "page": 1, "total_pages": 1}"#,
    );

    let ds = load_dataset(&path).unwrap();
    let users = ds.users().unwrap();
    assert_eq!(users[0].account_status, "Active");
    assert_eq!(users[0].subscription_tier, "Free");
    assert!(users[0].platforms.contains("Hulu"));
    assert_eq!(users[1].account_status, "Banned");
}

#[test]
fn merged_files_keep_file_order_and_prefixes() {
    let dir = TempDir::new().unwrap();
    let fresh = write(&dir, "new.json", r#"[{"title": "Fresh", "year": 2025, "type": "Movie", "platform": "Netflix"}]"#);
    let curated = write(&dir, "final.csv", "Title,Year,Netflix\nOld,1999,0\n");

    let ds = load_merged(&[fresh, curated]).unwrap();
    let ids: Vec<&str> = ds.content().unwrap().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["new-0", "final-0"]);
}

#[test]
fn merging_user_files_is_rejected() {
    let dir = TempDir::new().unwrap();
    let movies = write(&dir, "movies.json", r#"[{"title": "A"}]"#);
    let users = write(&dir, "users.json", r#"[{"username": "u"}]"#);
    let err = load_merged(&[movies, users]).unwrap_err();
    assert!(format!("{err:#}").contains("user records"));
}

#[test]
fn malformed_json_reports_the_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "broken.json", "[{\"title\": ");
    let err = load_dataset(&path).unwrap_err();
    assert!(format!("{err:#}").contains("broken.json"));
    assert!(load_file(Path::new("missing.json")).is_err());
}
