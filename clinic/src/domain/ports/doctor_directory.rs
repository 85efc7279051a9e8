//! Port for the read-only directory of bookable doctors.
use async_trait::async_trait;

use crate::domain::Doctor;

use super::define_port_error;

define_port_error! {
    /// Errors raised by doctor directory adapters.
    pub enum DoctorDirectoryError {
        /// The directory could not be reached.
        Unavailable { message: String } => "doctor directory unavailable: {message}",
    }
}

/// Port listing the doctors patients can book with.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DoctorDirectory: Send + Sync {
    /// Every bookable doctor, in display order.
    async fn list(&self) -> Result<Vec<Doctor>, DoctorDirectoryError>;

    /// Look up a doctor by id.
    async fn find(&self, id: &str) -> Result<Option<Doctor>, DoctorDirectoryError>;
}

/// Static directory with the three doctors offered by the booking form.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDoctorDirectory;

impl FixtureDoctorDirectory {
    fn doctors() -> Vec<Doctor> {
        vec![
            Doctor::new(
                "1",
                "Dr. João Silva",
                "Cardiologista",
                "https://mighty.tools/mockmind-api/content/human/91.jpg",
            ),
            Doctor::new(
                "2",
                "Dra. Maria Santos",
                "Dermatologista",
                "https://mighty.tools/mockmind-api/content/human/97.jpg",
            ),
            Doctor::new(
                "3",
                "Dr. Pedro Oliveira",
                "Oftalmologista",
                "https://mighty.tools/mockmind-api/content/human/79.jpg",
            ),
        ]
    }
}

#[async_trait]
impl DoctorDirectory for FixtureDoctorDirectory {
    async fn list(&self) -> Result<Vec<Doctor>, DoctorDirectoryError> {
        Ok(Self::doctors())
    }

    async fn find(&self, id: &str) -> Result<Option<Doctor>, DoctorDirectoryError> {
        Ok(Self::doctors().into_iter().find(|doctor| doctor.id == id))
    }
}
