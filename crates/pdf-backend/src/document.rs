//! PDF page I/O with `lopdf`.
//!
//! Reading collects each page's media box and rotation, following the page
//! tree for inherited attributes. Writing turns every referenced source page
//! into a Form XObject and draws each frame as a fresh page that places those
//! XObjects with a `cm` transform and paints fills as `re f` rectangles.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use slidereveal_common::error::{SlideError, SlideResult};
use slidereveal_deck_model::{
    Affine, Color, ComposedFrame, Deck, LayerContent, PageBox, Rotation, SourcePage,
};

/// Catalog entries that point into the page tree being replaced.
const PAGE_LINKED_CATALOG_KEYS: &[&[u8]] = &[
    b"Outlines",
    b"Dests",
    b"Names",
    b"OpenAction",
    b"StructTreeRoot",
    b"PageLabels",
    b"AcroForm",
];

/// Page attributes that may be inherited from the page tree.
const INHERITABLE_KEYS: &[&[u8]] = &[b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `Parent` chains.
const MAX_TREE_DEPTH: usize = 64;

fn pdf_error(context: &str, err: impl std::fmt::Display) -> SlideError {
    SlideError::document(format!("{context}: {err}"))
}

/// An input PDF loaded into memory.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    path: PathBuf,
    doc: Document,
    page_ids: Vec<ObjectId>,
}

impl SourceDocument {
    pub fn open(path: &Path) -> SlideResult<Self> {
        if !path.exists() {
            return Err(SlideError::input_not_found(path));
        }

        let doc = Document::load(path)
            .map_err(|e| pdf_error(&format!("Failed to read {}", path.display()), e))?;
        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();

        tracing::debug!(path = %path.display(), pages = page_ids.len(), "Opened document");
        Ok(Self {
            path: path.to_path_buf(),
            doc,
            page_ids,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// All pages in document order.
    pub fn pages(&self) -> SlideResult<Vec<SourcePage>> {
        self.page_ids
            .iter()
            .enumerate()
            .map(|(index, &id)| self.source_page(index, id))
            .collect()
    }

    fn source_page(&self, index: usize, id: ObjectId) -> SlideResult<SourcePage> {
        let media_box = match inherited(&self.doc, id, b"MediaBox") {
            Some(obj) => read_box(&self.doc, obj)
                .map_err(|e| pdf_error(&format!("Page {} has a bad MediaBox", index + 1), e))?,
            None => PageBox::LETTER,
        };

        let rotation = match inherited(&self.doc, id, b"Rotate") {
            Some(obj) => {
                let degrees = read_number(&self.doc, obj)
                    .map_err(|e| pdf_error(&format!("Page {} has a bad Rotate", index + 1), e))?;
                Rotation::from_degrees(degrees as i64)
                    .map_err(|e| pdf_error(&format!("Page {}", index + 1), e))?
            }
            None => Rotation::None,
        };

        Ok(SourcePage::new(index, media_box, rotation))
    }

    fn page_id(&self, index: usize) -> SlideResult<ObjectId> {
        self.page_ids.get(index).copied().ok_or_else(|| {
            SlideError::document(format!(
                "Page {} out of range ({} pages)",
                index + 1,
                self.page_ids.len()
            ))
        })
    }

    /// Set the same display rotation on every page.
    pub fn set_rotation(&mut self, rotation: Rotation) -> SlideResult<()> {
        for &id in &self.page_ids {
            page_dict_mut(&mut self.doc, id)?.set("Rotate", Object::Integer(rotation.degrees()));
        }
        tracing::debug!(degrees = rotation.degrees(), "Applied rotation to every page");
        Ok(())
    }

    /// Write page `index` as a standalone one-page PDF.
    pub fn extract_page(&self, index: usize, output: &Path) -> SlideResult<()> {
        let page_id = self.page_id(index)?;
        let mut doc = self.doc.clone();

        // Pin inherited attributes on the page itself before it leaves its tree.
        let pinned: Vec<(&[u8], Object)> = INHERITABLE_KEYS
            .iter()
            .filter_map(|&key| inherited(&doc, page_id, key).map(|obj| (key, obj.clone())))
            .collect();

        let pages_id = doc.new_object_id();
        let page = page_dict_mut(&mut doc, page_id)?;
        for (key, value) in pinned {
            page.set(key, value);
        }
        page.set("Parent", Object::Reference(pages_id));

        install_page_tree(&mut doc, pages_id, vec![page_id])?;
        save_document(&mut doc, output)
    }

    /// Writer for decks built from this document's pages.
    pub fn deck_writer(&self) -> DeckWriter<'_> {
        DeckWriter { source: self }
    }
}

/// Writes composed frames as a new PDF that reuses the source pages.
#[derive(Debug, Clone, Copy)]
pub struct DeckWriter<'a> {
    source: &'a SourceDocument,
}

impl<'a> DeckWriter<'a> {
    pub fn new(source: &'a SourceDocument) -> Self {
        Self { source }
    }

    /// Assemble the output document in memory.
    pub fn build(&self, deck: &Deck) -> SlideResult<Document> {
        if deck.is_empty() {
            return Err(SlideError::document("Refusing to write an empty deck"));
        }

        let mut doc = self.source.doc.clone();
        let pages_id = doc.new_object_id();

        let mut forms: BTreeMap<usize, ObjectId> = BTreeMap::new();
        for frame in deck.frames() {
            for page in frame.source_pages() {
                if !forms.contains_key(&page.index) {
                    let form = self.page_form(&mut doc, page)?;
                    forms.insert(page.index, form);
                }
            }
        }

        let mut kids = Vec::with_capacity(deck.len());
        for frame in deck.frames() {
            kids.push(frame_page(&mut doc, pages_id, frame, &forms)?);
        }

        install_page_tree(&mut doc, pages_id, kids)?;
        tracing::debug!(
            frames = deck.len(),
            source_pages = forms.len(),
            "Assembled output document"
        );
        Ok(doc)
    }

    /// Build the deck and write it to `output`.
    pub fn write(&self, deck: &Deck, output: &Path) -> SlideResult<()> {
        let mut doc = self.build(deck)?;
        doc.compress();
        save_document(&mut doc, output)
    }

    fn page_form(&self, doc: &mut Document, page: &SourcePage) -> SlideResult<ObjectId> {
        let page_id = self.source.page_id(page.index)?;
        let content = doc
            .get_page_content(page_id)
            .map_err(|e| pdf_error(&format!("Failed to read page {}", page.index + 1), e))?;
        let resources = inherited(doc, page_id, b"Resources")
            .cloned()
            .unwrap_or_else(|| Object::Dictionary(Dictionary::new()));

        let bbox = page.media_box;
        let form = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "FormType" => 1,
            "BBox" => vec![real(bbox.x0), real(bbox.y0), real(bbox.x1), real(bbox.y1)],
            "Resources" => resources,
        };
        Ok(doc.add_object(Stream::new(form, content)))
    }
}

fn form_name(index: usize) -> String {
    format!("P{index}")
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

fn cm(transform: &Affine) -> Operation {
    Operation::new("cm", transform.coefficients().iter().map(|&v| real(v)).collect())
}

fn fill_color(color: &Color) -> Operation {
    let operands = color.unit_channels().into_iter().map(Object::Real).collect();
    match color {
        Color::Gray(_) => Operation::new("g", operands),
        Color::Rgb(_) => Operation::new("rg", operands),
    }
}

/// Content stream drawing the frame's layers bottom to top.
fn frame_content(frame: &ComposedFrame) -> Vec<Operation> {
    let mut ops = Vec::with_capacity(frame.layers.len() * 5);
    for layer in &frame.layers {
        ops.push(Operation::new("q", vec![]));
        ops.push(cm(&layer.transform()));
        match &layer.content {
            LayerContent::Page { page } => {
                ops.push(Operation::new(
                    "Do",
                    vec![Object::Name(form_name(page.index).into_bytes())],
                ));
            }
            LayerContent::Fill { color } => {
                ops.push(fill_color(color));
                ops.push(Operation::new(
                    "re",
                    vec![0.into(), 0.into(), 1.into(), 1.into()],
                ));
                ops.push(Operation::new("f", vec![]));
            }
        }
        ops.push(Operation::new("Q", vec![]));
    }
    ops
}

fn frame_page(
    doc: &mut Document,
    pages_id: ObjectId,
    frame: &ComposedFrame,
    forms: &BTreeMap<usize, ObjectId>,
) -> SlideResult<ObjectId> {
    let mut xobjects = Dictionary::new();
    for page in frame.source_pages() {
        let form = forms.get(&page.index).copied().ok_or_else(|| {
            SlideError::document(format!("No form for page {}", page.index + 1))
        })?;
        xobjects.set(form_name(page.index), Object::Reference(form));
    }

    let content = Content {
        operations: frame_content(frame),
    }
    .encode()
    .map_err(|e| pdf_error("Failed to encode frame content", e))?;
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content));

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), real(frame.width), real(frame.height)],
        "Resources" => dictionary! { "XObject" => xobjects },
        "Contents" => content_id,
    }))
}

/// Point the catalog at a new page tree holding `kids` and drop everything
/// unreachable from it.
fn install_page_tree(doc: &mut Document, pages_id: ObjectId, kids: Vec<ObjectId>) -> SlideResult<()> {
    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids.into_iter().map(Object::Reference).collect::<Vec<_>>(),
            "Count" => count,
        }),
    );

    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|e| pdf_error("Document has no catalog", e))?;
    let catalog = doc
        .get_object_mut(catalog_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| pdf_error("Document catalog is unreadable", e))?;
    for key in PAGE_LINKED_CATALOG_KEYS {
        catalog.remove(key);
    }
    catalog.set("Pages", Object::Reference(pages_id));

    let pruned = doc.prune_objects();
    tracing::debug!(pruned = pruned.len(), "Pruned unreachable objects");
    Ok(())
}

/// Save to a sibling `.partial` file and rename it into place.
fn save_document(doc: &mut Document, output: &Path) -> SlideResult<()> {
    let partial = partial_path(output);
    if let Err(e) = doc.save(&partial) {
        let _ = std::fs::remove_file(&partial);
        return Err(pdf_error(&format!("Failed to write {}", output.display()), e));
    }
    std::fs::rename(&partial, output)?;
    Ok(())
}

fn partial_path(output: &Path) -> PathBuf {
    let mut name = output.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    output.with_file_name(name)
}

fn page_dict_mut(doc: &mut Document, id: ObjectId) -> SlideResult<&mut Dictionary> {
    doc.get_object_mut(id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| pdf_error("Page object is not a dictionary", e))
}

/// Look `key` up on the page, then on its ancestors.
fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }
    None
}

fn deref<'a>(doc: &'a Document, obj: &'a Object) -> SlideResult<&'a Object> {
    match obj {
        Object::Reference(id) => doc
            .get_object(*id)
            .map_err(|e| pdf_error("Dangling reference", e)),
        other => Ok(other),
    }
}

fn read_number(doc: &Document, obj: &Object) -> SlideResult<f64> {
    match deref(doc, obj)? {
        Object::Integer(i) => Ok(*i as f64),
        Object::Real(f) => Ok(*f as f64),
        other => Err(SlideError::document(format!(
            "Expected a number, found {other:?}"
        ))),
    }
}

fn read_box(doc: &Document, obj: &Object) -> SlideResult<PageBox> {
    let items = deref(doc, obj)?
        .as_array()
        .map_err(|e| pdf_error("Expected an array", e))?;
    if items.len() != 4 {
        return Err(SlideError::document(format!(
            "Expected four numbers, found {}",
            items.len()
        )));
    }
    let mut v = [0.0; 4];
    for (slot, item) in v.iter_mut().zip(items) {
        *slot = read_number(doc, item)?;
    }
    Ok(PageBox::new(v[0], v[1], v[2], v[3]))
}
