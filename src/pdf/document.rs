use anyhow::{Context, Result};
use lopdf::Document;
use std::path::Path;

pub struct PdfDocument {
    pub doc: Document,
    pub name: String,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read PDF: {}", path.display()))?;
        Self::from_bytes(&bytes, &path.display().to_string())
    }

    pub fn from_bytes(bytes: &[u8], name: &str) -> Result<Self> {
        let doc =
            Document::load_mem(bytes).with_context(|| format!("Failed to parse PDF: {}", name))?;
        Ok(PdfDocument {
            doc,
            name: name.to_string(),
        })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Copy the document, keeping only the given 1-based pages
    pub fn extract_pages(&self, pages: &[u32]) -> Result<Document> {
        let total = self.page_count();

        for &page in pages {
            if page == 0 || page > total {
                anyhow::bail!("Page {} is out of range (1-{})", page, total);
            }
        }

        let pages_to_delete: Vec<u32> = (1..=total).filter(|num| !pages.contains(num)).collect();

        let mut new_doc = self.doc.clone();
        if !pages_to_delete.is_empty() {
            new_doc.delete_pages(&pages_to_delete);
            new_doc.prune_objects();
        }

        Ok(new_doc)
    }

    /// Serialize a document to memory
    pub fn to_bytes(doc: &mut Document) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).context("Failed to serialize PDF")?;
        Ok(buffer)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Dictionary, Object, Stream};

    /// Build an in-memory PDF whose pages each print their own number
    pub(crate) fn sample_pdf(num_pages: u32) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let mut kids = Vec::new();
        for i in 1..=num_pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![100.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(format!("Page {}", i))]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => font_id },
                },
            });
            kids.push(Object::Reference(page_id));
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => num_pages as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    #[test]
    fn test_page_count() {
        let doc = PdfDocument::from_bytes(&sample_pdf(4), "four.pdf").unwrap();
        assert_eq!(doc.page_count(), 4);
    }

    #[test]
    fn test_extract_pages() {
        let doc = PdfDocument::from_bytes(&sample_pdf(6), "six.pdf").unwrap();
        let mut extracted = doc.extract_pages(&[2, 3, 4]).unwrap();
        assert_eq!(extracted.get_pages().len(), 3);

        let bytes = PdfDocument::to_bytes(&mut extracted).unwrap();
        let reloaded = PdfDocument::from_bytes(&bytes, "extracted.pdf").unwrap();
        assert_eq!(reloaded.page_count(), 3);
    }

    #[test]
    fn test_extract_out_of_range() {
        let doc = PdfDocument::from_bytes(&sample_pdf(2), "two.pdf").unwrap();
        assert!(doc.extract_pages(&[3]).is_err());
        assert!(doc.extract_pages(&[0]).is_err());
    }

    #[test]
    fn test_garbage_is_rejected() {
        let err = PdfDocument::from_bytes(b"not a pdf", "junk.pdf").err().unwrap();
        assert!(err.to_string().contains("junk.pdf"));
    }
}
