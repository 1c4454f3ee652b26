use crate::SERVER_ID;

pub const ERROR_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// HTTP status codes the server can emit.
///
/// - `Ok` (200): File served
/// - `BadRequest` (400): Request line missing or malformed
/// - `Forbidden` (403): Target resolves outside the document root
/// - `NotFound` (404): No such file, or the target is a directory
/// - `MethodNotAllowed` (405): Any method other than GET
/// - `InternalServerError` (500): File exists but could not be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use pubserve::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::Forbidden.as_u16(), 403);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// A complete HTTP response ready to be serialized.
///
/// The framing headers (`Content-Length`, `Connection`, `Server`, `Date`) are
/// derived at write time, so only the content type is stored here.
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl Response {
    /// Creates a 200 OK response carrying a file's contents.
    pub fn ok(content_type: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: StatusCode::Ok,
            content_type: content_type.into(),
            body: body.into(),
        }
    }

    /// Creates an error response with a generated HTML page.
    pub fn error(status: StatusCode) -> Self {
        Self {
            status,
            content_type: ERROR_CONTENT_TYPE.to_string(),
            body: error_page(status).into_bytes(),
        }
    }

    pub fn bad_request() -> Self {
        Self::error(StatusCode::BadRequest)
    }

    pub fn forbidden() -> Self {
        Self::error(StatusCode::Forbidden)
    }

    pub fn not_found() -> Self {
        Self::error(StatusCode::NotFound)
    }

    pub fn method_not_allowed() -> Self {
        Self::error(StatusCode::MethodNotAllowed)
    }

    pub fn internal_error() -> Self {
        Self::error(StatusCode::InternalServerError)
    }
}

fn error_page(status: StatusCode) -> String {
    let code = status.as_u16();
    let text = status.reason_phrase();

    format!(
        "<html>\n\
         <head><title>{code} {text}</title></head>\n\
         <body>\n\
         <h1>{code} {text}</h1>\n\
         <hr>\n\
         <p>{SERVER_ID}</p>\n\
         </body>\n\
         </html>\n"
    )
}
