#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Missing 'server' in the jira config yaml - run 'jtools config set jira.server URL'")]
    MissingServer,

    #[error("Missing '{0}' for '{1}' auth type")]
    MissingAuth(&'static str, &'static str),

    #[error("Unknown auth type: {0}")]
    UnknownAuthType(String),
}
