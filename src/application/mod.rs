pub mod detect_objects;
