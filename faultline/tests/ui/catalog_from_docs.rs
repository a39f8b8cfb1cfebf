use faultline::{FaultCatalog, Settings};

#[derive(Clone, Copy, Debug, FaultCatalog)]
#[fault(code = 400, safe)]
enum ImageFault {
    /// Image %(image_id)s could not be found.
    #[fault(code = 404)]
    NotFound,
    /// Image %(image_id)s is %(size)d bytes, over the 100%% quota.
    TooLarge,
}

#[derive(FaultCatalog)]
enum NoFaults {}

fn main() {
    let fault = ImageFault::TooLarge
        .fault()
        .with("image_id", "img-1")
        .with("size", 4096);
    let message = fault.format_message(&Settings::strict()).unwrap();
    assert_eq!(message, "Image img-1 is 4096 bytes, over the 100% quota.");
    assert_eq!(ImageFault::NotFound.kind().code(), 404);
    assert_eq!(ImageFault::KINDS.len(), 2);
    assert!(NoFaults::KINDS.is_empty());
}
