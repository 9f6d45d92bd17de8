mod document;
mod filing_status;
mod input_record;
mod result_record;

pub use document::{DocumentReceipt, DocumentRef, MAX_UPLOAD_BYTES};
pub use filing_status::FilingStatusCode;
pub use input_record::{FieldError, FieldName, InputRecord};
pub use result_record::{CalculationResponse, ResponseError, ResultRecord};
