//! 八步注册向导
//!
//! 纯状态机实现：表单草稿、逐步校验、照片暂存与终态提交编排都在这里，
//! 不碰任何信号或 DOM。Leptos 侧只负责把输入值写进草稿、按
//! [`StepOutcome`] 渲染下一步。

use penzi_shared::UserProfile;
use penzi_shared::protocol::CompleteRegistrationRequest;

use crate::adapter::CredentialStore;
use crate::api::{HttpTransport, MultipartPart, PenziApi};
use crate::error::{PenziError, PenziResult};
use crate::log::log_warn;

// =========================================================
// 常量与步骤元数据
// =========================================================

pub const TOTAL_STEPS: u8 = 8;

/// 单张照片体积上限（5 MB）
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// 相册最多暂存 6 张，先选的优先保留
pub const MAX_PHOTOS: usize = 6;

/// 有文件被过滤掉时给用户的提示文案
pub const SKIPPED_PHOTOS_MESSAGE: &str =
    "Some files were skipped. Please upload images under 5MB.";

/// 步骤标题与说明，顺序即步骤序号
#[derive(Debug, Clone, Copy)]
pub struct StepMeta {
    pub title: &'static str,
    pub description: &'static str,
}

pub const STEP_META: [StepMeta; TOTAL_STEPS as usize] = [
    StepMeta {
        title: "Basic Information",
        description: "Tell us about yourself",
    },
    StepMeta {
        title: "Location",
        description: "Where are you located?",
    },
    StepMeta {
        title: "Education",
        description: "Your educational background",
    },
    StepMeta {
        title: "Profession",
        description: "What do you do for work?",
    },
    StepMeta {
        title: "Personal Details",
        description: "Tell us more about yourself",
    },
    StepMeta {
        title: "Cultural Background",
        description: "Your ethnicity",
    },
    StepMeta {
        title: "About You",
        description: "Describe yourself",
    },
    StepMeta {
        title: "Profile Photos",
        description: "Add photos to your profile",
    },
];

/// 下拉框选项。教育程度是（提交值，展示文案）对，其余两组值即文案。
pub const GENDER_OPTIONS: [&str; 2] = ["Male", "Female"];

pub const EDUCATION_OPTIONS: [(&str, &str); 8] = [
    ("Primary", "Primary School"),
    ("Secondary", "Secondary School"),
    ("Certificate", "Certificate"),
    ("Diploma", "Diploma"),
    ("Degree", "Bachelor's Degree"),
    ("Masters", "Master's Degree"),
    ("PhD", "PhD"),
    ("Other", "Other"),
];

pub const MARITAL_STATUS_OPTIONS: [&str; 4] = ["Single", "Divorced", "Widowed", "Separated"];

// =========================================================
// 表单草稿与校验
// =========================================================

/// 向导期间的表单草稿。字段全部按字符串保存（数字输入框给出的
/// 本来就是文本），提交时才解析成载荷。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationDraft {
    pub first_name: String,
    pub last_name: String,
    pub age: String,
    pub gender: String,
    pub county: String,
    pub town: String,
    pub level_of_education: String,
    pub profession: String,
    pub marital_status: String,
    pub religion: String,
    pub ethnicity: String,
    pub self_description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FirstName,
    LastName,
    Age,
    Gender,
    County,
    Town,
    LevelOfEducation,
    Profession,
    MaritalStatus,
    Religion,
    Ethnicity,
    SelfDescription,
}

/// 单个控件的校验错误，文案直接用于渲染
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: Field, message: &'static str) -> Self {
        Self { field, message }
    }
}

fn require(errors: &mut Vec<FieldError>, value: &str, field: Field, message: &'static str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, message));
    }
}

fn validate_age(errors: &mut Vec<FieldError>, raw: &str) {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.push(FieldError::new(Field::Age, "Age is required"));
        return;
    }
    match raw.parse::<u32>() {
        Ok(age) if age < 18 => errors.push(FieldError::new(
            Field::Age,
            "You must be at least 18 years old",
        )),
        Ok(age) if age > 100 => {
            errors.push(FieldError::new(Field::Age, "Please enter a valid age"))
        }
        Ok(_) => {}
        Err(_) => errors.push(FieldError::new(Field::Age, "Please enter a valid age")),
    }
}

/// 校验某一步的字段，错误顺序与控件顺序一致。
/// 照片为可选项，第 8 步没有必填校验。
pub fn validate_step(step: u8, draft: &RegistrationDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();
    match step {
        1 => {
            require(
                &mut errors,
                &draft.first_name,
                Field::FirstName,
                "First name is required",
            );
            require(
                &mut errors,
                &draft.last_name,
                Field::LastName,
                "Last name is required",
            );
            validate_age(&mut errors, &draft.age);
            require(&mut errors, &draft.gender, Field::Gender, "Gender is required");
        }
        2 => {
            require(&mut errors, &draft.county, Field::County, "County is required");
            require(&mut errors, &draft.town, Field::Town, "Town is required");
        }
        3 => require(
            &mut errors,
            &draft.level_of_education,
            Field::LevelOfEducation,
            "Education level is required",
        ),
        4 => require(
            &mut errors,
            &draft.profession,
            Field::Profession,
            "Profession is required",
        ),
        5 => {
            require(
                &mut errors,
                &draft.marital_status,
                Field::MaritalStatus,
                "Marital status is required",
            );
            require(
                &mut errors,
                &draft.religion,
                Field::Religion,
                "Religion is required",
            );
        }
        6 => require(
            &mut errors,
            &draft.ethnicity,
            Field::Ethnicity,
            "Ethnicity is required",
        ),
        7 => {
            let text = draft.self_description.trim();
            if text.is_empty() {
                errors.push(FieldError::new(
                    Field::SelfDescription,
                    "Description is required",
                ));
            } else if text.chars().count() < 10 {
                errors.push(FieldError::new(
                    Field::SelfDescription,
                    "Description must be at least 10 characters",
                ));
            }
        }
        _ => {}
    }
    errors
}

// =========================================================
// 照片暂存
// =========================================================

/// 已选待传的照片，字节在选择时读出，方便直接转 multipart
#[derive(Debug, Clone, PartialEq)]
pub struct StagedPhoto {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl StagedPhoto {
    /// 只收图片类型且不超过 [`MAX_PHOTO_BYTES`]
    pub fn is_acceptable(&self) -> bool {
        self.mime_type.starts_with("image/") && self.bytes.len() <= MAX_PHOTO_BYTES
    }
}

/// 一次暂存调用的结果，skipped 非零时 UI 弹 [`SKIPPED_PHOTOS_MESSAGE`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageOutcome {
    /// 实际进入暂存区的数量（截断后）
    pub added: usize,
    /// 因类型、体积或超出六张上限被丢弃的数量
    pub skipped: usize,
}

impl StageOutcome {
    pub fn any_skipped(&self) -> bool {
        self.skipped > 0
    }
}

// =========================================================
// 向导状态机
// =========================================================

/// Next 的结果：校验失败原地不动，最后一步通过后进入提交
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Advanced(u8),
    Invalid,
    ReadyToSubmit,
}

/// 提交结果。照片上传失败不回滚已完成的注册，只反映在
/// `photos_uploaded` 上。
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    pub user: UserProfile,
    pub message: String,
    pub photos_uploaded: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationWizard {
    current_step: u8,
    draft: RegistrationDraft,
    staged_photos: Vec<StagedPhoto>,
    step_errors: Vec<FieldError>,
}

impl Default for RegistrationWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationWizard {
    pub fn new() -> Self {
        Self {
            current_step: 1,
            draft: RegistrationDraft::default(),
            staged_photos: Vec::new(),
            step_errors: Vec::new(),
        }
    }

    pub fn current_step(&self) -> u8 {
        self.current_step
    }

    pub fn step_meta(&self) -> &'static StepMeta {
        &STEP_META[usize::from(self.current_step - 1)]
    }

    /// 进度条百分比，四舍五入到整数
    pub fn progress_percent(&self) -> u32 {
        (u32::from(self.current_step) * 100 + u32::from(TOTAL_STEPS) / 2) / u32::from(TOTAL_STEPS)
    }

    pub fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    /// 表单输入直接写草稿，校验只在 Next 时发生
    pub fn draft_mut(&mut self) -> &mut RegistrationDraft {
        &mut self.draft
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.step_errors
    }

    pub fn error_for(&self, field: Field) -> Option<&'static str> {
        self.step_errors
            .iter()
            .find(|err| err.field == field)
            .map(|err| err.message)
    }

    pub fn staged_photos(&self) -> &[StagedPhoto] {
        &self.staged_photos
    }

    /// Next：本步校验不过则原地停留，错误留在 [`Self::errors`] 里
    pub fn advance(&mut self) -> StepOutcome {
        self.step_errors = validate_step(self.current_step, &self.draft);
        if !self.step_errors.is_empty() {
            return StepOutcome::Invalid;
        }
        if self.current_step < TOTAL_STEPS {
            self.current_step += 1;
            StepOutcome::Advanced(self.current_step)
        } else {
            StepOutcome::ReadyToSubmit
        }
    }

    /// Previous：退一步但不清除任何已填内容，表单从草稿回填
    pub fn back(&mut self) {
        if self.current_step > 1 {
            self.current_step -= 1;
            self.step_errors.clear();
        }
    }

    /// 过滤、追加并截断暂存照片
    pub fn stage_photos(&mut self, files: Vec<StagedPhoto>) -> StageOutcome {
        let before = self.staged_photos.len();
        let mut skipped = 0usize;
        for file in files {
            if file.is_acceptable() {
                self.staged_photos.push(file);
            } else {
                skipped += 1;
            }
        }
        // 超出六张上限被截掉的尾部同样计入 skipped，提示照常弹出
        let overflow = self.staged_photos.len().saturating_sub(MAX_PHOTOS);
        self.staged_photos.truncate(MAX_PHOTOS);
        StageOutcome {
            added: self.staged_photos.len() - before,
            skipped: skipped + overflow,
        }
    }

    pub fn remove_photo(&mut self, index: usize) {
        if index < self.staged_photos.len() {
            self.staged_photos.remove(index);
        }
    }

    /// 把草稿转成提交载荷；任何一步缺字段都会在这里兜底报错
    pub fn payload(&self) -> PenziResult<CompleteRegistrationRequest> {
        for step in 1..=TOTAL_STEPS {
            if let Some(first) = validate_step(step, &self.draft).into_iter().next() {
                return Err(PenziError::validation(first.message));
            }
        }
        let age = self
            .draft
            .age
            .trim()
            .parse::<u32>()
            .map_err(|_| PenziError::validation("Please enter a valid age"))?;
        Ok(CompleteRegistrationRequest {
            first_name: self.draft.first_name.trim().to_string(),
            last_name: self.draft.last_name.trim().to_string(),
            age,
            gender: self.draft.gender.trim().to_string(),
            county: self.draft.county.trim().to_string(),
            town: self.draft.town.trim().to_string(),
            level_of_education: self.draft.level_of_education.trim().to_string(),
            profession: self.draft.profession.trim().to_string(),
            marital_status: self.draft.marital_status.trim().to_string(),
            religion: self.draft.religion.trim().to_string(),
            ethnicity: self.draft.ethnicity.trim().to_string(),
            self_description: self.draft.self_description.trim().to_string(),
        })
    }

    fn multipart_parts(&self) -> Vec<MultipartPart> {
        self.staged_photos
            .iter()
            .map(|photo| MultipartPart {
                field_name: "photos".to_string(),
                file_name: photo.file_name.clone(),
                mime_type: photo.mime_type.clone(),
                bytes: photo.bytes.clone(),
            })
            .collect()
    }

    /// 终态提交：整包资料一次提交，照片随后批量上传。
    /// 照片上传失败只记日志，注册本身已经完成。
    pub async fn submit<C, S>(&self, api: &PenziApi<C, S>) -> PenziResult<SubmissionOutcome>
    where
        C: HttpTransport,
        S: CredentialStore,
    {
        let payload = self.payload()?;
        let response = api.complete_registration(&payload).await?;

        let mut photos_uploaded = false;
        if !self.staged_photos.is_empty() {
            match api.upload_registration_photos(self.multipart_parts()).await {
                Ok(_) => photos_uploaded = true,
                Err(err) => {
                    log_warn!("photo upload failed, but registration was successful: {err}")
                }
            }
        }

        Ok(SubmissionOutcome {
            user: response.user,
            message: response.message,
            photos_uploaded,
        })
    }
}

// =========================================================
// 测试
// =========================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::tests::MockCredentials;
    use crate::api::{HttpBody, MockTransport};
    use serde_json::json;

    fn photo(name: &str, mime: &str, size: usize) -> StagedPhoto {
        StagedPhoto {
            file_name: name.to_string(),
            mime_type: mime.to_string(),
            bytes: vec![0u8; size],
        }
    }

    fn filled_wizard() -> RegistrationWizard {
        let mut wizard = RegistrationWizard::new();
        let draft = wizard.draft_mut();
        draft.first_name = "Amina".to_string();
        draft.last_name = "Odhiambo".to_string();
        draft.age = "27".to_string();
        draft.gender = "Female".to_string();
        draft.county = "Nairobi".to_string();
        draft.town = "Westlands".to_string();
        draft.level_of_education = "Degree".to_string();
        draft.profession = "Software Engineer".to_string();
        draft.marital_status = "Single".to_string();
        draft.religion = "Christian".to_string();
        draft.ethnicity = "Luo".to_string();
        draft.self_description = "Friendly, outgoing and curious about the world.".to_string();
        wizard
    }

    fn build_api(transport: MockTransport) -> PenziApi<MockTransport, MockCredentials> {
        PenziApi::new(
            "http://test".to_string(),
            transport,
            MockCredentials::with_session("tok-1", "ref-1"),
        )
    }

    #[test]
    fn test_advance_blocked_on_missing_fields() {
        let mut wizard = RegistrationWizard::new();
        assert_eq!(wizard.advance(), StepOutcome::Invalid);
        assert_eq!(wizard.current_step(), 1);
        assert_eq!(
            wizard.error_for(Field::FirstName),
            Some("First name is required")
        );
        assert_eq!(wizard.error_for(Field::Gender), Some("Gender is required"));
    }

    #[test]
    fn test_age_bounds() {
        let mut wizard = filled_wizard();

        wizard.draft_mut().age = "17".to_string();
        assert_eq!(wizard.advance(), StepOutcome::Invalid);
        assert_eq!(
            wizard.error_for(Field::Age),
            Some("You must be at least 18 years old")
        );

        wizard.draft_mut().age = "101".to_string();
        assert_eq!(wizard.advance(), StepOutcome::Invalid);
        assert_eq!(wizard.error_for(Field::Age), Some("Please enter a valid age"));

        wizard.draft_mut().age = "not-a-number".to_string();
        assert_eq!(wizard.advance(), StepOutcome::Invalid);
        assert_eq!(wizard.error_for(Field::Age), Some("Please enter a valid age"));

        wizard.draft_mut().age = "18".to_string();
        assert_eq!(wizard.advance(), StepOutcome::Advanced(2));
        assert!(wizard.errors().is_empty());
    }

    #[test]
    fn test_description_minimum_length() {
        let mut wizard = filled_wizard();
        for _ in 0..6 {
            wizard.advance();
        }
        assert_eq!(wizard.current_step(), 7);

        wizard.draft_mut().self_description = "Too short".to_string();
        assert_eq!(wizard.advance(), StepOutcome::Invalid);
        assert_eq!(
            wizard.error_for(Field::SelfDescription),
            Some("Description must be at least 10 characters")
        );
    }

    #[test]
    fn test_walks_all_steps_then_ready_to_submit() {
        let mut wizard = filled_wizard();
        for expected in 2..=TOTAL_STEPS {
            assert_eq!(wizard.advance(), StepOutcome::Advanced(expected));
        }
        assert_eq!(wizard.advance(), StepOutcome::ReadyToSubmit);
        assert_eq!(wizard.current_step(), TOTAL_STEPS);
    }

    #[test]
    fn test_back_preserves_draft() {
        let mut wizard = filled_wizard();
        wizard.advance();
        wizard.advance();
        assert_eq!(wizard.current_step(), 3);

        let before = wizard.draft().clone();
        wizard.back();
        assert_eq!(wizard.current_step(), 2);
        assert_eq!(wizard.draft(), &before);
        // 回退后再前进要能原样通过
        assert_eq!(wizard.advance(), StepOutcome::Advanced(3));
    }

    #[test]
    fn test_back_stops_at_first_step() {
        let mut wizard = RegistrationWizard::new();
        wizard.back();
        assert_eq!(wizard.current_step(), 1);
    }

    #[test]
    fn test_progress_percent_rounds() {
        let mut wizard = filled_wizard();
        assert_eq!(wizard.progress_percent(), 13);
        wizard.advance();
        assert_eq!(wizard.progress_percent(), 25);
        for _ in 0..6 {
            wizard.advance();
        }
        assert_eq!(wizard.progress_percent(), 100);
    }

    #[test]
    fn test_photo_staging_filters_type_and_size() {
        let mut wizard = RegistrationWizard::new();
        let outcome = wizard.stage_photos(vec![
            photo("a.jpg", "image/jpeg", 1024),
            photo("b.txt", "text/plain", 1024),
            photo("c.png", "image/png", MAX_PHOTO_BYTES + 1),
            photo("d.jpg", "image/jpeg", MAX_PHOTO_BYTES),
        ]);
        assert_eq!(outcome, StageOutcome { added: 2, skipped: 2 });
        assert!(outcome.any_skipped());
        assert_eq!(wizard.staged_photos().len(), 2);
    }

    #[test]
    fn test_photo_staging_keeps_first_six() {
        let mut wizard = RegistrationWizard::new();
        wizard.stage_photos(vec![photo("first.jpg", "image/jpeg", 512)]);

        let batch = (0..7)
            .map(|i| photo(&format!("p{i}.jpg"), "image/jpeg", 512))
            .collect();
        let outcome = wizard.stage_photos(batch);
        // 已有 1 张 + 新来 7 张，进 5 张、截掉的 2 张计入 skipped
        assert_eq!(outcome, StageOutcome { added: 5, skipped: 2 });
        assert!(outcome.any_skipped());
        assert_eq!(wizard.staged_photos().len(), MAX_PHOTOS);
        assert_eq!(wizard.staged_photos()[0].file_name, "first.jpg");
        assert_eq!(wizard.staged_photos()[5].file_name, "p4.jpg");
    }

    #[test]
    fn test_remove_photo() {
        let mut wizard = RegistrationWizard::new();
        wizard.stage_photos(vec![
            photo("a.jpg", "image/jpeg", 10),
            photo("b.jpg", "image/jpeg", 10),
        ]);

        wizard.remove_photo(0);
        assert_eq!(wizard.staged_photos().len(), 1);
        assert_eq!(wizard.staged_photos()[0].file_name, "b.jpg");

        // 越界下标不生效
        wizard.remove_photo(5);
        assert_eq!(wizard.staged_photos().len(), 1);
    }

    #[test]
    fn test_payload_trims_whitespace() {
        let mut wizard = filled_wizard();
        wizard.draft_mut().first_name = "  Amina ".to_string();
        let payload = wizard.payload().unwrap();
        assert_eq!(payload.first_name, "Amina");
        assert_eq!(payload.age, 27);
    }

    #[tokio::test]
    async fn test_submit_posts_payload_then_photos() {
        let transport = MockTransport::new();
        transport.mock_response(
            "http://test/api/registration/complete",
            200,
            json!({
                "message": "Registration completed successfully",
                "user": { "id": "u1", "firstName": "Amina", "registrationStage": "completed" }
            }),
        );
        transport.mock_response(
            "http://test/api/registration/upload-photos",
            200,
            json!({ "message": "2 photos uploaded", "photos": [], "totalPhotos": 2 }),
        );

        let api = build_api(transport);
        let mut wizard = filled_wizard();
        wizard.stage_photos(vec![
            photo("a.jpg", "image/jpeg", 3),
            photo("b.png", "image/png", 3),
        ]);

        let outcome = wizard.submit(&api).await.unwrap();
        assert!(outcome.photos_uploaded);
        assert_eq!(outcome.user.id, "u1");
        assert_eq!(outcome.message, "Registration completed successfully");

        let requests = api.transport.requests.borrow();
        assert_eq!(requests.len(), 2);

        let HttpBody::Json(body) = &requests[0].body else {
            panic!("expected json body");
        };
        let value: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(value["firstName"], "Amina");
        assert_eq!(value["age"], 27);
        assert_eq!(
            value["selfDescription"],
            "Friendly, outgoing and curious about the world."
        );

        let HttpBody::Multipart(parts) = &requests[1].body else {
            panic!("expected multipart body");
        };
        assert_eq!(parts.len(), 2);
        assert!(parts.iter().all(|part| part.field_name == "photos"));
        assert_eq!(parts[1].file_name, "b.png");
    }

    #[tokio::test]
    async fn test_submit_survives_photo_upload_failure() {
        let transport = MockTransport::new();
        transport.mock_response(
            "http://test/api/registration/complete",
            200,
            json!({
                "message": "Registration completed successfully",
                "user": { "id": "u1" }
            }),
        );
        transport.mock_response(
            "http://test/api/registration/upload-photos",
            500,
            json!({ "error": "storage unavailable" }),
        );

        let api = build_api(transport);
        let mut wizard = filled_wizard();
        wizard.stage_photos(vec![photo("a.jpg", "image/jpeg", 3)]);

        let outcome = wizard.submit(&api).await.unwrap();
        assert!(!outcome.photos_uploaded);
        assert_eq!(outcome.message, "Registration completed successfully");
    }

    #[tokio::test]
    async fn test_submit_without_photos_skips_upload() {
        let transport = MockTransport::new();
        transport.mock_response(
            "http://test/api/registration/complete",
            200,
            json!({ "user": { "id": "u1" } }),
        );

        let api = build_api(transport);
        let outcome = filled_wizard().submit(&api).await.unwrap();
        assert!(!outcome.photos_uploaded);
        assert_eq!(api.transport.requests.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_rejects_incomplete_draft() {
        let api = build_api(MockTransport::new());
        let err = RegistrationWizard::new().submit(&api).await.unwrap_err();
        assert_eq!(err.message(), "First name is required");
        assert!(api.transport.requests.borrow().is_empty());
    }
}
