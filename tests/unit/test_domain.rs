use vision_api::domain::detection::{
    entity::{DetectionResult, ImageSource},
    errors::DomainError,
    value_objects::{Confidence, ImageFileName, ModelId, ModelRoute},
};

#[test]
fn model_id_accepts_versioned_and_bare_ids() {
    for raw in ["coco/3", "coco", "my-workspace/12", "a/b/c", "team_1.v2/7"] {
        assert!(ModelId::new(raw.to_string()).is_ok(), "expected {raw} to be valid");
    }
}

#[test]
fn model_id_is_trimmed() {
    let model = ModelId::new("  coco/3 \n".to_string()).unwrap();
    assert_eq!(model.as_str(), "coco/3");
}

#[test]
fn model_id_rejects_characters_that_would_alter_the_url() {
    for raw in ["", "coco/3?x=1", "coco#frag", "co co", "/coco", "coco/", "a//b", "../admin", "a/./b"] {
        assert!(
            matches!(ModelId::new(raw.to_string()), Err(DomainError::InvalidModelId(_))),
            "expected {raw:?} to be rejected"
        );
    }
    assert!(ModelId::new("a".repeat(201)).is_err());
}

#[test]
fn model_route_splits_only_two_segment_ids() {
    let versioned = ModelId::new("coco/3".to_string()).unwrap();
    assert_eq!(
        versioned.route(),
        ModelRoute::Versioned {
            workspace: "coco",
            version: "3"
        }
    );

    let bare = ModelId::new("coco".to_string()).unwrap();
    assert_eq!(bare.route(), ModelRoute::Bare("coco"));

    let deep = ModelId::new("a/b/c".to_string()).unwrap();
    assert_eq!(deep.route(), ModelRoute::Bare("a/b/c"));
}

#[test]
fn confidence_enforces_percent_range() {
    assert!(Confidence::new(0.0).is_ok());
    assert!(Confidence::new(100.0).is_ok());
    assert!(Confidence::new(-0.5).is_err());
    assert!(Confidence::new(100.1).is_err());
    assert!(Confidence::new(f64::NAN).is_err());
    assert!(Confidence::new(f64::INFINITY).is_err());
}

#[test]
fn confidence_parses_text() {
    assert_eq!(Confidence::parse(" 50 ").unwrap().value(), 50.0);
    assert_eq!(Confidence::parse("12.5").unwrap().value(), 12.5);
    assert!(matches!(
        Confidence::parse("high"),
        Err(DomainError::InvalidConfidence(_))
    ));
}

#[test]
fn confidence_renders_whole_numbers_without_fraction() {
    assert_eq!(Confidence::new(50.0).unwrap().to_string(), "50");
    assert_eq!(Confidence::new(12.5).unwrap().to_string(), "12.5");
}

#[test]
fn file_name_extension_check_is_case_insensitive() {
    let name = ImageFileName::new("Holiday.JPEG").unwrap();
    assert_eq!(name.extension(), "jpeg");
    assert_eq!(name.as_str(), "Holiday.JPEG");

    for ok in ["a.png", "a.jpg", "a.gif", "a.bmp", "a.tiff", "a.webp", "a.b.WebP"] {
        assert!(ImageFileName::new(ok).is_ok(), "expected {ok} to be accepted");
    }
}

#[test]
fn file_name_without_allowed_extension_is_invalid() {
    for bad in ["", "photo", "photo.", "photo.txt", "photo.png.exe", "photo.tif"] {
        assert_eq!(ImageFileName::new(bad), Err(DomainError::InvalidFile), "{bad:?}");
    }
}

#[test]
fn inline_source_strips_data_uri_and_rejects_empty() {
    let source = ImageSource::inline("data:image/png;base64,QUJD").unwrap();
    assert!(matches!(&source, ImageSource::InlineBase64 { data } if data == "QUJD"));

    assert_eq!(ImageSource::inline("").unwrap_err(), DomainError::NoImage);
}

#[test]
fn detection_result_counts_predictions() {
    let model = ModelId::new("coco/3".to_string()).unwrap();
    let result = DetectionResult::new(
        "roboflow",
        &model,
        vec![serde_json::json!({"class": "cat"}), serde_json::json!({"class": "dog"})],
    );
    assert_eq!(result.count, 2);
    assert_eq!(result.model, "coco/3");
    assert_eq!(result.provider, "roboflow");
}
