use super::*;
use crate::assets::decode::encode_png;
use crate::foundation::core::{Rgba8, RgbaFrame};

fn collage() -> Collage {
    Collage {
        image: encode_png(&RgbaFrame::filled(2, 2, Rgba8::WHITE)).unwrap(),
        title: "06-Jul-2025".to_string(),
    }
}

#[test]
fn document_contains_only_the_collage() {
    let html = print_document_html(&collage());
    assert!(html.contains("<title>Print Memories</title>"));
    assert!(html.contains(r#"src="data:image/png;base64,"#));
    assert!(html.contains("window.print()"));
    assert!(html.contains("window.close()"));
    assert_eq!(html.matches("<img").count(), 1);
}

#[test]
fn file_spooler_writes_the_document() {
    let dir = PathBuf::from("target").join("unit_print");
    let mut spooler = HtmlFileSpooler::new(&dir, false);
    let job = spooler.spool("<html></html>").unwrap();
    let path = job.location.unwrap();
    assert_eq!(path, dir.join(PRINT_DOCUMENT_NAME));
    assert_eq!(std::fs::read_to_string(path).unwrap(), "<html></html>");
}

#[test]
fn unwritable_target_is_a_print_failure() {
    let blocker = PathBuf::from("target").join("unit_print_blocker");
    std::fs::create_dir_all(blocker.parent().unwrap()).unwrap();
    std::fs::write(&blocker, b"file, not a dir").unwrap();
    let mut spooler = HtmlFileSpooler::new(blocker.join("sub"), false);
    assert!(matches!(
        spooler.spool("<html></html>"),
        Err(BoothError::PrintFailed(_))
    ));
}

#[test]
fn memory_spooler_keeps_documents() {
    let mut spooler = InMemorySpooler::new();
    spooler.spool("a").unwrap();
    spooler.spool("b").unwrap();
    assert_eq!(spooler.documents(), ["a", "b"]);
}
