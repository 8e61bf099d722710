use serde::Serialize;
use utoipa::ToSchema;

/// 성공 응답 구조체
///
/// 형식:
/// ```json
/// {
///   "success": true,
///   "data": [ ... ]
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct BaseResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> BaseResponse<T> {
    /// 성공 응답 생성
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// 에러 응답 구조체
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// 항상 false
    #[schema(example = false)]
    pub success: bool,
    #[schema(example = "Latitude must be between -90 and 90")]
    pub error: String,
}

impl ErrorResponse {
    /// 에러 응답 생성
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
