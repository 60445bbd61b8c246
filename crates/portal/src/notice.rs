use shared_types::{format_file_size, UploadViolation};
use std::fmt;

/// Blocking alert shown after a user action. One per action, never queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Uploaded,
    UploadFailed,
    NoFilesSelected,
    TooManyFiles { max: usize },
    FileTooLarge { file_name: String, max: u64 },
    FileTypeNotAllowed { file_name: String },
    Updated,
    UpdateFailed,
    Deleted,
    DeleteFailed,
    DownloadFailed,
    Reviewed,
    ReviewFailed,
    InvalidReview,
    ReminderSent,
    ReminderFailed,
    InvalidReminder,
    FileNotFound,
}

impl Notice {
    pub fn is_error(&self) -> bool {
        !matches!(
            self,
            Notice::Uploaded
                | Notice::Updated
                | Notice::Deleted
                | Notice::Reviewed
                | Notice::ReminderSent
        )
    }

    pub fn message(&self) -> String {
        match self {
            Notice::Uploaded => "Tải lên thành công!".to_string(),
            Notice::UploadFailed => "Tải lên thất bại. Vui lòng thử lại.".to_string(),
            Notice::NoFilesSelected => "Vui lòng chọn ít nhất một file.".to_string(),
            Notice::TooManyFiles { max } => {
                format!("Chỉ được tải lên tối đa {} file mỗi lần.", max)
            }
            Notice::FileTooLarge { file_name, max } => format!(
                "File \"{}\" vượt quá dung lượng cho phép ({}).",
                file_name,
                format_file_size(*max)
            ),
            Notice::FileTypeNotAllowed { file_name } => {
                format!("Định dạng file \"{}\" không được hỗ trợ.", file_name)
            }
            Notice::Updated => "Cập nhật thành công!".to_string(),
            Notice::UpdateFailed => "Cập nhật thất bại. Vui lòng thử lại.".to_string(),
            Notice::Deleted => "Xóa file thành công!".to_string(),
            Notice::DeleteFailed => "Xóa file thất bại. Vui lòng thử lại.".to_string(),
            Notice::DownloadFailed => "Tải xuống thất bại. Vui lòng thử lại.".to_string(),
            Notice::Reviewed => "Đã cập nhật kết quả duyệt!".to_string(),
            Notice::ReviewFailed => "Duyệt hồ sơ thất bại. Vui lòng thử lại.".to_string(),
            Notice::InvalidReview => "Trạng thái duyệt không hợp lệ.".to_string(),
            Notice::ReminderSent => "Đã gửi nhắc nhở đến giảng viên!".to_string(),
            Notice::ReminderFailed => "Gửi nhắc nhở thất bại. Vui lòng thử lại.".to_string(),
            Notice::InvalidReminder => {
                "Vui lòng nhập nội dung và chọn giảng viên cần nhắc.".to_string()
            }
            Notice::FileNotFound => "Không tìm thấy file.".to_string(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl From<UploadViolation> for Notice {
    fn from(violation: UploadViolation) -> Self {
        match violation {
            UploadViolation::NoFiles => Notice::NoFilesSelected,
            UploadViolation::TooManyFiles { max } => Notice::TooManyFiles { max },
            UploadViolation::FileTooLarge { file_name, max } => {
                Notice::FileTooLarge { file_name, max }
            }
            UploadViolation::TypeNotAllowed { file_name } => {
                Notice::FileTypeNotAllowed { file_name }
            }
        }
    }
}
