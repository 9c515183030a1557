//! Tests for error types including source chaining and message formatting

#[cfg(test)]
mod tests {
    use gaborgif::GaborError;
    use gaborgif::io::error::{file_system_error, invalid_parameter};
    use std::error::Error;
    use std::path::PathBuf;

    // Tests error source chaining works correctly
    // Verified by breaking source chain
    #[test]
    fn test_error_source_chain() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = file_system_error("/tmp/test.gif", "read", io_error);

        let source = error.source().expect("io error is chained");
        assert_eq!(source.to_string(), "file not found");
    }

    // Tests InvalidParameter error contains all fields
    // Verified by omitting value from message
    #[test]
    fn test_invalid_parameter_error() {
        let error = invalid_parameter("contrast", &1.5, &"must lie in [0, 1]");

        let message = error.to_string();
        assert_eq!(
            message,
            "Invalid parameter 'contrast' = '1.5': must lie in [0, 1]"
        );
        assert!(error.source().is_none());
    }

    #[test]
    fn test_empty_sequence_error() {
        let error = GaborError::EmptySequence;
        assert_eq!(error.to_string(), "No frames to encode");
        assert!(error.source().is_none());
    }

    // Tests encoding errors name the destination and keep the codec error
    // Verified by excluding source error from message
    #[test]
    fn test_encoding_error() {
        let image_error = image::ImageError::IoError(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "access denied",
        ));
        let error = GaborError::Encoding {
            path: PathBuf::from("assets/images/out.gif"),
            source: image_error,
        };

        let message = error.to_string();
        assert!(message.contains("assets/images/out.gif"));
        assert!(message.contains("access denied"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_image_load_and_export_errors() {
        let load = GaborError::ImageLoad {
            path: PathBuf::from("photo.png"),
            source: image::ImageError::IoError(std::io::Error::other("truncated")),
        };
        let export = GaborError::ImageExport {
            path: PathBuf::from("patch.png"),
            source: image::ImageError::IoError(std::io::Error::other("disk full")),
        };

        assert!(load.to_string().starts_with("Failed to load image 'photo.png'"));
        assert!(export.to_string().contains("disk full"));
        assert!(load.source().is_some());
        assert!(export.source().is_some());
    }

    #[test]
    fn test_file_system_error_message() {
        let error = file_system_error(
            "out/dir",
            "create directory",
            std::io::Error::other("read-only"),
        );
        assert_eq!(
            error.to_string(),
            "File system error during create directory on 'out/dir': read-only"
        );
    }

    #[test]
    fn test_thread_pool_error() {
        let error = GaborError::ThreadPool {
            reason: "out of threads".to_string(),
        };
        assert!(error.to_string().contains("out of threads"));
        assert!(error.source().is_none());
    }
}
