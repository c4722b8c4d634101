/// Failures of the snippet store. Validation failures are recoverable and
/// meant to be shown to the user, never to abort the surrounding dialog.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("an item named `{key}` already exists")]
    DuplicateKey { key: String },
    #[error("{0}")]
    Validation(String),
    #[error("no item named `{key}`")]
    NotFound { key: String },
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum DownloadError {
    #[error("please select a download area first")]
    NoAreaSelected,
    #[error("{0}")]
    Validation(String),
    #[error("the query wizard could not parse the request: {0}")]
    Parse(String),
    #[error("no data found in this area")]
    NoData,
    #[error("download failed: {0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_user_presentable() {
        let err = StoreError::DuplicateKey {
            key: "Hotels".to_owned(),
        };
        assert_eq!(err.to_string(), "an item named `Hotels` already exists");
        assert_eq!(
            DownloadError::NoAreaSelected.to_string(),
            "please select a download area first"
        );
    }
}
