//! User, tutor and student profile endpoints.

use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::envelope;
use crate::http::{ApiError, ApiResponse, ApiResult};
use crate::models::{
    Education, Experience, FullTeacherProfile, StudentProfile, Subject, TeacherProfile,
    TeachingDetails, UserProfile,
};

#[derive(Clone)]
pub struct ProfileService {
    api: ApiClient,
}

impl ProfileService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn user_profile(&self) -> ApiResult<UserProfile> {
        envelope::unwrap(self.api.get("/users/profile").await)
    }

    pub async fn teacher_profile(&self) -> ApiResult<Option<TeacherProfile>> {
        envelope::unwrap(self.api.get("/teachers/profile").await)
    }

    pub async fn update_teacher_profile(&self, profile: &TeacherProfile) -> ApiResult<TeacherProfile> {
        envelope::unwrap(self.api.put("/teachers/profile", profile).await)
    }

    pub async fn education(&self) -> ApiResult<Vec<Education>> {
        envelope::unwrap(self.api.get("/teachers/education").await).map(none_as_empty)
    }

    pub async fn update_education(&self, entries: &[Education]) -> ApiResult<Vec<Education>> {
        if let Some(blank) = entries.iter().find(|e| e.institution.trim().is_empty()) {
            debug!("Rejecting education entry without institution: {:?}", blank.id);
            return Err(ApiError::Validation("Institution is required".into()));
        }
        envelope::unwrap(self.api.post("/teachers/education", entries).await).map(none_as_empty)
    }

    pub async fn experience(&self) -> ApiResult<Vec<Experience>> {
        envelope::unwrap(self.api.get("/teachers/experience").await).map(none_as_empty)
    }

    pub async fn update_experience(&self, entries: &[Experience]) -> ApiResult<Vec<Experience>> {
        if entries.iter().any(|e| e.organization.trim().is_empty()) {
            return Err(ApiError::Validation("Organization is required".into()));
        }
        envelope::unwrap(self.api.post("/teachers/experience", entries).await).map(none_as_empty)
    }

    pub async fn teaching_details(&self) -> ApiResult<Option<TeachingDetails>> {
        envelope::unwrap(self.api.get("/teachers/teaching-details").await)
    }

    pub async fn update_teaching_details(
        &self,
        details: &TeachingDetails,
    ) -> ApiResult<TeachingDetails> {
        if details.subjects.is_empty() {
            return Err(ApiError::Validation("Select at least one subject".into()));
        }
        envelope::unwrap(self.api.put("/teachers/teaching-details", details).await)
    }

    pub async fn subjects(&self) -> ApiResult<Vec<Subject>> {
        envelope::unwrap(self.api.get("/teachers/subjects").await).map(none_as_empty)
    }

    pub async fn student_profile(&self) -> ApiResult<Option<StudentProfile>> {
        envelope::unwrap(self.api.get("/students/profile").await)
    }

    pub async fn update_student_profile(
        &self,
        profile: &StudentProfile,
    ) -> ApiResult<StudentProfile> {
        envelope::unwrap(self.api.put("/students/profile", profile).await)
    }

    /// Fetch the four tutor wizard sections concurrently and assemble them.
    ///
    /// Fails if any section fails; the first failure in section order wins.
    pub async fn full_teacher_profile(&self) -> ApiResult<FullTeacherProfile> {
        let (profile, education, experience, details) = tokio::join!(
            self.teacher_profile(),
            self.education(),
            self.experience(),
            self.teaching_details(),
        );

        let profile = profile?;
        let education = education?;
        let experience = experience?;
        let details = details?;

        Ok(ApiResponse {
            status_code: profile.status_code,
            data: FullTeacherProfile {
                profile: profile.data,
                education: education.data,
                experience: experience.data,
                teaching_details: details.data,
            },
        })
    }

    pub async fn upload_profile_picture(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        mime: &str,
    ) -> ApiResult<Option<String>> {
        if bytes.is_empty() {
            warn!("Refusing to upload empty profile picture");
            return Err(ApiError::Validation("Choose an image to upload".into()));
        }
        envelope::unwrap(
            self.api
                .upload("/users/profile-picture", "file", file_name, bytes, mime)
                .await,
        )
    }
}

/// Lists come back as `null` when the tutor has not filled the step yet
fn none_as_empty<T>(response: ApiResponse<Option<Vec<T>>>) -> ApiResponse<Vec<T>> {
    response.map(Option::unwrap_or_default)
}
