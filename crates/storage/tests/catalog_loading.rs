use std::fs;

use quiz_core::model::LevelNumber;
use storage::catalog::{SkipReason, load_categories};

fn lvl(n: u32) -> LevelNumber {
    LevelNumber::new(n).unwrap()
}

#[test]
fn loads_good_sources_and_reports_bad_ones() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("Films.csv"),
        "level,question,answer,alternatives\n\
         1,Who directed Jaws?,Steven Spielberg,\"Spielberg, S. Spielberg\"\n\
         1,Best picture 1998?,Titanic,\n\
         2.0,Year of Alien?,1979,\n\
         ,No level here,Nope,\n\
         3,,Missing prompt,\n",
    )
    .unwrap();
    fs::write(dir.path().join("Broken.csv"), "title,body\nfoo,bar\n").unwrap();
    fs::write(dir.path().join("Empty.csv"), "level,question,answer\n").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let load = load_categories(dir.path()).unwrap();

    let names: Vec<_> = load.bank.category_names().collect();
    assert_eq!(names, vec!["Films"]);

    let films = load.bank.category("Films").unwrap();
    let first = films.level(lvl(1)).unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(first.question(0).unwrap().prompt(), "Who directed Jaws?");
    assert!(first.question(0).unwrap().accepts("spielberg"));
    assert!(first.question(0).unwrap().accepts("s. spielberg"));
    assert_eq!(films.level(lvl(2)).unwrap().len(), 1);
    assert!(films.level(lvl(3)).is_none());

    assert_eq!(load.loaded.len(), 1);
    assert_eq!(load.loaded[0].dropped_rows, 2);
    assert_eq!(load.loaded[0].questions, 3);

    assert_eq!(load.skipped.len(), 2);
    let broken = load.skipped.iter().find(|s| s.name == "Broken").unwrap();
    assert_eq!(
        broken.reason,
        SkipReason::MissingColumns(vec![
            "level".to_string(),
            "question".to_string(),
            "answer".to_string()
        ])
    );
    let empty = load.skipped.iter().find(|s| s.name == "Empty").unwrap();
    assert_eq!(empty.reason, SkipReason::NoQuestions);
}

#[test]
fn accepts_legacy_russian_headers() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("Кино.csv"),
        "Уровень,Вопрос,Ответ,Альтернативы\n\
         1,Режиссёр «Сталкера»?,Тарковский,Андрей Тарковский\n",
    )
    .unwrap();

    let load = load_categories(dir.path()).unwrap();
    let question = load
        .bank
        .category("Кино")
        .and_then(|c| c.level(lvl(1)))
        .and_then(|l| l.question(0))
        .unwrap();
    assert!(question.accepts("АНДРЕЙ ТАРКОВСКИЙ"));
    assert_eq!(question.display_answer(), "Тарковский");
}

#[test]
fn missing_directory_is_created_empty() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("categories");

    let load = load_categories(&dir).unwrap();

    assert!(dir.is_dir());
    assert!(load.bank.is_empty());
    assert!(load.skipped.is_empty());
}
