use error_stack::Report;
use kernel::KernelError;
use std::sync::PoisonError;

/// Turns an infrastructure error into a [`KernelError`] report, keeping the source in the stack.
pub trait ConvertError {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}

impl<T> ConvertError for Result<T, serde_json::Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| Report::from(error).change_context(KernelError::Internal))
    }
}

impl<T> ConvertError for Result<T, std::io::Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| Report::from(error).change_context(KernelError::Internal))
    }
}

impl<T, G> ConvertError for Result<T, PoisonError<G>> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|_| {
            Report::new(KernelError::Internal).attach_printable("Lock poisoned by a panicked holder")
        })
    }
}
