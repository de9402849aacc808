//! Opening, saving and querying a database directory.

mod common;

use common::{fixed_head, FixedProvenance, Fixture};
use rstest::rstest;
use std::sync::Arc;
use tagdb::{
    Context, Database, DatabaseError, LabelRecord, MasterRef, MemoryLogger, Namespace, RawTag,
    RenderType, StoreError,
};
use tagdb_parser::inline::parse_inline;
use tagdb_parser::TagRefResolver;

fn raw(text: &str) -> RawTag {
    RawTag::parse(text).unwrap()
}

async fn open(fixture: &Fixture) -> Database {
    Database::create(fixture.root(), None).await.unwrap()
}

#[tokio::test]
async fn test_open_fixture() {
    let fixture = Fixture::new();
    let db = open(&fixture).await;

    assert_eq!(db.version(), 6.0);
    assert_eq!(db.revision(), 1);
    assert_eq!(db.stores().count(), Namespace::ALL.len());
    assert!(db.store(Namespace::Temp).is_none());

    let bar = db.get("bar").unwrap();
    assert_eq!(bar.namespace, Namespace::Artist);
    assert_eq!(bar.name, parse_inline("Bar"));
    assert_eq!(
        db.get("foo").unwrap().master,
        Some(MasterRef::new(Namespace::Artist, raw("bar")))
    );
}

#[rstest]
#[case::older("5\n")]
#[case::just_below("5.99\n")]
#[case::newer("7\n")]
#[case::next_major("7.0\n")]
#[tokio::test]
async fn test_version_outside_window(#[case] version: &str) {
    let fixture = Fixture::new();
    std::fs::write(fixture.root().join("version"), version).unwrap();

    let err = Database::create(fixture.root(), None).await.unwrap_err();
    assert!(matches!(err, DatabaseError::UnsupportedVersion { .. }));
}

#[tokio::test]
async fn test_minor_version_opens() {
    let fixture = Fixture::new();
    std::fs::write(fixture.root().join("version"), "6.5\n").unwrap();

    let db = open(&fixture).await;
    assert_eq!(db.version(), 6.5);
    assert_eq!(db.info().unwrap().version, 6.5);
}

#[tokio::test]
async fn test_missing_version_file() {
    let fixture = Fixture::new();
    std::fs::remove_file(fixture.root().join("version")).unwrap();

    let err = Database::create(fixture.root(), None).await.unwrap_err();
    match err {
        DatabaseError::MissingVersion { root, .. } => assert_eq!(root, fixture.root()),
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_missing_namespace_file() {
    let fixture = Fixture::new();
    std::fs::remove_file(fixture.path(Namespace::Female)).unwrap();

    let err = Database::create(fixture.root(), None).await.unwrap_err();
    match err {
        DatabaseError::MissingNamespace { namespace, path, .. } => {
            assert_eq!(namespace, Namespace::Female);
            assert_eq!(path, fixture.path(Namespace::Female));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_create_fails_on_bad_file() {
    let fixture = Fixture::new();
    fixture.write(Namespace::Group, "| a | b |\n| x | y |\n");

    let err = Database::create(fixture.root(), None).await.unwrap_err();
    assert!(matches!(
        err,
        DatabaseError::Store(StoreError::Parse {
            namespace: Namespace::Group,
            ..
        })
    ));
}

#[tokio::test]
async fn test_load_is_all_or_nothing() {
    let fixture = Fixture::new();
    let mut db = open(&fixture).await;

    fixture.write(Namespace::Artist, "# Artists\n");
    fixture.write(Namespace::Female, "| a | b |\n| x | y |\n");

    assert!(db.load().await.is_err());
    assert!(db.get("foo").is_some());
    assert_eq!(db.store(Namespace::Artist).unwrap().len(), 2);
}

#[tokio::test]
async fn test_save_and_reopen() {
    let fixture = Fixture::new();
    let mut db = open(&fixture).await;

    let record = LabelRecord::new(Namespace::Parody, raw("touhou project"))
        .with_name(parse_inline("东方Project"))
        .with_intro(parse_inline("see `artist:bar`"));
    db.store_mut(Namespace::Parody)
        .unwrap()
        .insert(record.clone(), &Context::new(Namespace::Parody))
        .unwrap();

    db.save().await.unwrap();
    assert_eq!(db.revision(), 2);
    assert!(fixture.read(Namespace::Parody).starts_with("# parody\n"));

    let reopened = open(&fixture).await;
    assert_eq!(reopened.get("touhou project"), Some(&record));
    assert_eq!(reopened.get("foo"), db.get("foo"));
}

#[tokio::test]
async fn test_failed_save_keeps_revision() {
    let fixture = Fixture::new();
    let mut db = open(&fixture).await;

    std::fs::remove_file(fixture.path(Namespace::Mixed)).unwrap();
    std::fs::create_dir(fixture.path(Namespace::Mixed)).unwrap();

    let err = db.save().await.unwrap_err();
    assert!(matches!(
        err,
        DatabaseError::Store(StoreError::Io {
            namespace: Namespace::Mixed,
            ..
        })
    ));
    assert_eq!(db.revision(), 1);
}

#[tokio::test]
async fn test_get_probes_in_namespace_order() {
    let fixture = Fixture::new();
    fixture.write(
        Namespace::Parody,
        "| Raw | Name | Description | Links |\n|-|-|-|-|\n| bar | Bar (series) | | |\n",
    );
    let db = open(&fixture).await;

    assert_eq!(db.get("bar").unwrap().namespace, Namespace::Parody);
    assert_eq!(
        db.get_in(Namespace::Artist, "bar").unwrap().namespace,
        Namespace::Artist
    );
    assert!(db.get("bad_key").is_none());
}

#[tokio::test]
async fn test_check_reports_broken_masters() {
    let fixture = Fixture::new();
    let mut db = open(&fixture).await;
    let logger = Arc::new(MemoryLogger::new());
    db.set_logger(logger.clone());

    let artists = db.store_mut(Namespace::Artist).unwrap();
    let ctx = Context::new(Namespace::Artist);
    artists
        .insert(
            LabelRecord::alias(
                Namespace::Artist,
                raw("baz"),
                MasterRef::new(Namespace::Group, raw("nobody")),
            ),
            &ctx,
        )
        .unwrap();
    artists
        .insert(
            LabelRecord::alias(
                Namespace::Artist,
                raw("qux"),
                MasterRef::new(Namespace::Artist, raw("foo")),
            ),
            &ctx,
        )
        .unwrap();

    let diagnostics = db.check();
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(
        diagnostics[0].to_string(),
        "artist:baz: master group:nobody does not exist"
    );
    assert_eq!(
        diagnostics[1].to_string(),
        "artist:qux: master artist:foo is itself an alias of artist:bar"
    );
    assert_eq!(logger.entries(), diagnostics);
}

#[tokio::test]
async fn test_check_clean_fixture() {
    let fixture = Fixture::new();
    assert!(open(&fixture).await.check().is_empty());
}

#[rstest]
#[case::bare("bar", Some("bar"))]
#[case::matching("artist:bar", Some("bar"))]
#[case::abbreviated("a:bar", Some("bar"))]
#[case::elsewhere("other:bar", Some("artist:bar"))]
#[case::unknown("nobody", None)]
#[tokio::test]
async fn test_resolver_titles(#[case] text: &str, #[case] title: Option<&str>) {
    let fixture = Fixture::new();
    let db = open(&fixture).await;
    assert_eq!(db.resolve(text).title().as_deref(), title);
}

#[tokio::test]
async fn test_reports_without_provenance() {
    let fixture = Fixture::new();
    let db = open(&fixture).await;

    let info = db.info().unwrap();
    assert!(info.provenance.is_none());
    assert_eq!(info.namespaces.len(), Namespace::ALL.len());

    assert!(matches!(db.head(), Err(DatabaseError::NoProvenance)));
    assert!(matches!(
        db.render(RenderType::Text),
        Err(DatabaseError::NoProvenance)
    ));
}

#[tokio::test]
async fn test_info_counts_aliases() {
    let fixture = Fixture::new();
    let db = Database::create(fixture.root(), Some(Box::new(FixedProvenance)))
        .await
        .unwrap();

    let info = db.info().unwrap();
    let artists = info
        .namespaces
        .iter()
        .find(|s| s.namespace == Namespace::Artist)
        .unwrap();
    assert_eq!((artists.count, artists.masters, artists.aliases), (2, 1, 1));

    let provenance = info.provenance.unwrap();
    assert_eq!(provenance.head, fixed_head());
    assert_eq!(provenance.remote_url, "https://github.com/owner/db.git");
}

#[tokio::test]
async fn test_render_with_provenance() {
    let fixture = Fixture::new();
    let db = Database::create(fixture.root(), Some(Box::new(FixedProvenance)))
        .await
        .unwrap();

    let snapshot = db.render(RenderType::Raw).unwrap();
    assert_eq!(snapshot.repo, "https://github.com/owner/db.git");
    assert_eq!(snapshot.head.author.name, "Alice");

    let artists = &snapshot.data[&Namespace::Artist];
    assert_eq!(artists.count, 2);
    assert_eq!(artists.prefix, "# Artists\n\n");
    assert_eq!(artists.data["bar"].intro, "A **prolific** artist");
    assert_eq!(artists.data["foo"].master.as_deref(), Some("artist:bar"));

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["data"]["artist"]["data"]["bar"]["name"], "Bar");
    assert_eq!(json["head"]["author"]["email"], "alice@example.com");
}

#[tokio::test]
async fn test_render_html_titles_references() {
    let fixture = Fixture::new();
    fixture.write(
        Namespace::Other,
        "| Raw | Name | Description | Links |\n|-|-|-|-|\n| tribute | Tribute | to `other:bar` | |\n",
    );
    let db = Database::create(fixture.root(), Some(Box::new(FixedProvenance)))
        .await
        .unwrap();

    let snapshot = db.render(RenderType::Html).unwrap();
    let intro = snapshot.data[&Namespace::Other].data["tribute"]
        .intro
        .as_str()
        .unwrap()
        .to_string();
    assert!(intro.starts_with("to <abbr"), "{}", intro);
    assert!(intro.contains(r#"title="artist:bar""#), "{}", intro);
}
