//! EXAMINE command handler.
//!
//! EXAMINE is SELECT in read-only mode (RFC 3501 Section 6.3.2). The
//! piece the scanner relies on is `* N EXISTS`, the number of
//! messages in the folder. The tagged OK carries `[READ-ONLY]`.
//!
//! Returns the examined folder name (or `None` if it cannot be
//! opened).

use crate::fake_imap::io::write_line;
use crate::fake_imap::mailbox::Mailbox;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};

/// Handle the EXAMINE command. Returns the opened folder name.
pub async fn handle_examine<S: AsyncRead + AsyncWrite + Unpin>(
    tag: &str,
    folder_name: &str,
    mailbox: &Mailbox,
    stream: &mut BufReader<S>,
) -> Option<String> {
    let Some(folder) = mailbox
        .get_folder(folder_name)
        .filter(|f| !f.unselectable)
    else {
        let resp = format!("{tag} NO Cannot open folder\r\n");
        let _ = write_line(stream, &resp).await;
        return None;
    };

    // RFC 3501 Section 6.3.1: required FLAGS response
    let _ = write_line(
        stream,
        "* FLAGS (\\Seen \\Answered \\Flagged \\Deleted \\Draft)\r\n",
    )
    .await;

    let exists = format!("* {} EXISTS\r\n", folder.messages.len());
    let _ = write_line(stream, &exists).await;

    // RFC 3501 Section 6.3.1: required RECENT response
    let _ = write_line(stream, "* 0 RECENT\r\n").await;

    let _ = write_line(stream, "* OK [UIDVALIDITY 1]\r\n").await;

    let resp = format!("{tag} OK [READ-ONLY] EXAMINE completed\r\n");
    let _ = write_line(stream, &resp).await;
    Some(folder_name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_imap::mailbox::MailboxBuilder;
    use tokio::io::BufReader;

    async fn run(tag: &str, folder_name: &str, mailbox: &Mailbox) -> (String, Option<String>) {
        let (client, server) = tokio::io::duplex(4096);
        let mut stream = BufReader::new(server);

        let opened = handle_examine(tag, folder_name, mailbox, &mut stream).await;
        drop(stream);

        let mut buf = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut BufReader::new(client), &mut buf)
            .await
            .unwrap();
        (String::from_utf8(buf).unwrap(), opened)
    }

    #[tokio::test]
    async fn examines_existing_folder_read_only() {
        let mailbox = MailboxBuilder::new()
            .folder("INBOX")
            .message(&["a@example.com"], &[])
            .message(&["b@example.com"], &[])
            .build();

        let (output, opened) = run("A1", "INBOX", &mailbox).await;

        assert_eq!(opened, Some("INBOX".to_string()));
        assert!(output.contains("* 2 EXISTS"));
        assert!(output.contains("A1 OK [READ-ONLY]"));
    }

    #[tokio::test]
    async fn empty_folder_has_zero_exists() {
        let mailbox = MailboxBuilder::new().folder("Empty").build();
        let (output, _) = run("A1", "Empty", &mailbox).await;
        assert!(output.contains("* 0 EXISTS"));
    }

    #[tokio::test]
    async fn returns_none_for_missing_folder() {
        let mailbox = MailboxBuilder::new().folder("INBOX").build();

        let (output, opened) = run("A1", "NoSuchFolder", &mailbox).await;

        assert!(opened.is_none());
        assert!(output.contains("A1 NO Cannot open folder"));
    }

    #[tokio::test]
    async fn unselectable_folder_is_refused() {
        let mailbox = MailboxBuilder::new().folder("Broken").unselectable().build();

        let (output, opened) = run("A1", "Broken", &mailbox).await;

        assert!(opened.is_none());
        assert!(output.starts_with("A1 NO"));
    }
}
