//! Show document information.

use std::path::PathBuf;

use slidereveal_pdf_backend::SourceDocument;

use super::resolve_input;

pub fn run(input: PathBuf, json: bool) -> anyhow::Result<()> {
    let path = resolve_input(&input);
    let document = SourceDocument::open(&path)?;
    let pages = document.pages()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&pages)?);
        return Ok(());
    }

    println!("Document: {}", path.display());
    println!("  Pages: {}", document.page_count());
    println!();

    for page in &pages {
        let b = page.media_box;
        println!(
            "  {:>3}: {:.1} x {:.1} pt (MediaBox [{} {} {} {}], rotate {})",
            page.index + 1,
            page.width(),
            page.height(),
            b.x0,
            b.y0,
            b.x1,
            b.y1,
            page.rotation.degrees()
        );
    }

    Ok(())
}
