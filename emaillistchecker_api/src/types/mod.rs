mod envelope;
pub use self::envelope::{decode_envelope, JsonObject};

mod verify;
pub use self::verify::{Verdict, VerifyRequest, VerifyResult};

mod batch;
pub use self::batch::{BatchJob, BatchJobID, BatchRequest, BatchResults, BatchStatus};

mod finder;
pub use self::finder::{CompanySearchRequest, DomainSearchRequest, FindEmailRequest};
