//! PDF text extraction with bounded OCR fallback.
//!
//! Native text-layer extraction runs first. When the text layer is empty
//! or below the configured threshold the document is treated as likely
//! scanned, and the embedded page images of a bounded number of leading
//! pages are handed to the OCR engine instead. The page bound is a
//! configured cost/accuracy trade-off, not a correctness limit.

use crate::ocr::OcrEngine;
use crate::parser::ParserConfig;
use crate::ParseError;
use lopdf::{Document, Object, ObjectId};
use shared_types::{DocumentType, ParsedDocument};
use tracing::{debug, info};

pub struct PdfParser;

impl PdfParser {
    pub fn parse(
        bytes: &[u8],
        config: &ParserConfig,
        ocr: &dyn OcrEngine,
    ) -> Result<ParsedDocument, ParseError> {
        let doc = Document::load_mem(bytes).map_err(|e| ParseError::InvalidPdf(e.to_string()))?;
        if doc.is_encrypted() {
            return Err(ParseError::PasswordProtected);
        }

        let pages = doc.get_pages();
        if pages.is_empty() {
            return Err(ParseError::InvalidPdf("PDF has no pages".to_string()));
        }
        let page_count = pages.len() as u32;

        let native_text = match pdf_extract::extract_text_from_mem(bytes) {
            Ok(text) => text,
            Err(e) => {
                let message = e.to_string().to_lowercase();
                if message.contains("encrypted") || message.contains("password") {
                    return Err(ParseError::PasswordProtected);
                }
                // Image-only PDFs can fail native extraction outright.
                // Treat that like an empty text layer and let OCR decide.
                debug!(error = %e, "native text extraction failed, trying OCR fallback");
                String::new()
            }
        };

        if native_text.trim().len() >= config.min_native_text_len {
            return Ok(ParsedDocument {
                text: native_text,
                source_format: DocumentType::Pdf,
                ocr_used: false,
                page_count,
                table_shape: None,
            });
        }

        info!(
            page_count,
            ocr_max_pages = config.ocr_max_pages,
            "PDF text layer below threshold, running OCR fallback"
        );

        let mut recognized = Vec::new();
        for (_, page_id) in pages.iter().take(config.ocr_max_pages) {
            for image in page_images(&doc, *page_id) {
                let text = ocr.recognize(&image)?;
                if !text.trim().is_empty() {
                    recognized.push(text);
                }
            }
        }

        let ocr_used = !recognized.is_empty();
        let text = if ocr_used {
            recognized.join("\n")
        } else {
            native_text
        };

        Ok(ParsedDocument {
            text,
            source_format: DocumentType::Pdf,
            ocr_used,
            page_count,
            table_shape: None,
        })
    }
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    if let Object::Reference(id) = object {
        doc.get_object(*id).unwrap_or(object)
    } else {
        object
    }
}

/// Collect the JPEG (DCTDecode) image XObject streams of one page.
/// Scanned documents are typically one full-page JPEG per page.
fn page_images(doc: &Document, page_id: ObjectId) -> Vec<Vec<u8>> {
    let mut images = Vec::new();
    let Ok(page) = doc.get_dictionary(page_id) else {
        return images;
    };
    let Some(resources) = page
        .get(b"Resources")
        .ok()
        .map(|o| resolve(doc, o))
        .and_then(|o| o.as_dict().ok())
    else {
        return images;
    };
    let Some(xobjects) = resources
        .get(b"XObject")
        .ok()
        .map(|o| resolve(doc, o))
        .and_then(|o| o.as_dict().ok())
    else {
        return images;
    };

    for (_, object) in xobjects.iter() {
        if let Object::Stream(stream) = resolve(doc, object) {
            if is_jpeg_image(doc, stream) {
                images.push(stream.content.clone());
            }
        }
    }
    images
}

fn is_jpeg_image(doc: &Document, stream: &lopdf::Stream) -> bool {
    let is_image = matches!(
        stream.dict.get(b"Subtype"),
        Ok(Object::Name(name)) if name.as_slice() == b"Image".as_slice()
    );
    if !is_image {
        return false;
    }

    match stream.dict.get(b"Filter") {
        Ok(Object::Name(name)) => name.as_slice() == b"DCTDecode".as_slice(),
        Ok(Object::Array(filters)) => filters.iter().any(|f| {
            matches!(
                resolve(doc, f),
                Object::Name(name) if name.as_slice() == b"DCTDecode".as_slice()
            )
        }),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Stream};

    struct StubOcr(&'static str);

    impl OcrEngine for StubOcr {
        fn recognize(&self, _image: &[u8]) -> Result<String, ParseError> {
            Ok(self.0.to_string())
        }
    }

    /// Single-page PDF with a real text layer.
    fn text_pdf(text: &str) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![50.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    /// Single-page PDF with no text layer, only an embedded JPEG XObject.
    fn scanned_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Filter" => "DCTDecode",
                "Width" => 8,
                "Height" => 8,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10],
        ));
        let resources_id = doc.add_object(dictionary! {
            "XObject" => dictionary! { "Im0" => image_id },
        });
        let content_id = doc.add_object(Stream::new(dictionary! {}, b"q /Im0 Do Q".to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn extracts_native_text_layer() {
        let bytes = text_pdf("Certificate of Origin BATCH-20260115-A1B2C3");
        let parsed =
            PdfParser::parse(&bytes, &ParserConfig::default(), &StubOcr("unused")).unwrap();

        assert!(!parsed.ocr_used);
        assert_eq!(parsed.page_count, 1);
        assert!(parsed.text.contains("Certificate"));
        assert!(parsed.text.contains("Origin"));
    }

    #[test]
    fn falls_back_to_ocr_for_scanned_pdf() {
        let bytes = scanned_pdf();
        let parsed = PdfParser::parse(
            &bytes,
            &ParserConfig::default(),
            &StubOcr("SCANNED CERTIFICATE CERT/2026/0042"),
        )
        .unwrap();

        assert!(parsed.ocr_used);
        assert!(parsed.text.contains("SCANNED CERTIFICATE"));
    }

    #[test]
    fn scanned_pdf_without_recognizable_text_keeps_empty_text() {
        let bytes = scanned_pdf();
        let parsed = PdfParser::parse(&bytes, &ParserConfig::default(), &StubOcr("")).unwrap();

        assert!(!parsed.ocr_used);
        assert!(parsed.text.trim().is_empty());
    }

    #[test]
    fn garbage_bytes_are_an_invalid_pdf() {
        let err = PdfParser::parse(
            b"not a pdf at all",
            &ParserConfig::default(),
            &StubOcr("unused"),
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::InvalidPdf(_)));
    }
}
