use std::fs;
use std::path::PathBuf;

use artegen::compose;

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("tests/goldens/expected");
    p.push(name);
    p
}

#[test]
fn golden_card_markup_matches_fixture() {
    let doc = compose(
        "Red Shoes",
        "Comfortable running shoes",
        "file:///uploads/red-shoes.png",
        "$49.99",
    );
    let digest = doc.digest();

    let expected_path = golden_path("red_shoes.sha256");
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        if let Some(dir) = expected_path.parent() {
            fs::create_dir_all(dir).expect("create golden dir");
        }
        fs::write(&expected_path, format!("{}\n", digest)).expect("write golden");
        println!("Updated golden: {:?}", expected_path);
        return;
    }

    let expected = fs::read_to_string(&expected_path).unwrap_or_else(|e| {
        panic!(
            "missing golden {:?} ({}); run with UPDATE_GOLDENS=1 to create it",
            expected_path, e
        )
    });
    assert_eq!(digest, expected.trim(), "card layout changed; rerun with UPDATE_GOLDENS=1 if intended");
}
