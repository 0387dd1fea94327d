//! Scripted in-process FTP server for integration tests.
//!
//! Speaks just enough RFC 959 + EPSV for the client's operations, keeps
//! files in memory, and records every command line it receives.

#![allow(dead_code)]

use passive_ftp::ftp::{FtpClient, FtpClientConfig};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};

pub const USER: &str = "dlpuser";
pub const PASSWORD: &str = "rNrKYTX9g7z3RgJRmxWuGHbeu";

/// Gap between a preliminary `150` and the data/completion that follows,
/// so the client's single control read sees the `150` on its own.
const PRELIMINARY_GAP: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct MockOptions {
    pub greeting: Vec<u8>,
    /// Replace the EPSV reply (to exercise malformed negotiation).
    pub epsv_reply: Option<String>,
    /// Send LIST/RETR data first, then `150` and `226` in one write.
    pub merge_completion: bool,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            greeting: b"220 Mock FTP ready\r\n".to_vec(),
            epsv_reply: None,
            merge_completion: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct ServerState {
    pub files: BTreeMap<String, Vec<u8>>,
    pub dirs: BTreeSet<String>,
    pub commands: Vec<String>,
}

impl ServerState {
    pub fn keywords(&self) -> Vec<String> {
        self.commands
            .iter()
            .map(|c| c.split(' ').next().unwrap_or_default().to_string())
            .collect()
    }
}

pub struct MockServer {
    pub port: u16,
    pub state: Arc<Mutex<ServerState>>,
    handle: JoinHandle<()>,
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl MockServer {
    pub async fn start() -> Self {
        Self::start_with(MockOptions::default()).await
    }

    pub async fn start_with(options: MockOptions) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let mut initial = ServerState::default();
        initial.dirs.insert("/".into());
        initial.dirs.insert("/pub".into());
        initial
            .files
            .insert("/readme.txt".into(), b"welcome to the mock server\n".to_vec());
        let state = Arc::new(Mutex::new(initial));

        let accept_state = state.clone();
        let handle = tokio::spawn(async move {
            loop {
                let Ok((sock, _)) = listener.accept().await else {
                    break;
                };
                let st = accept_state.clone();
                let opts = options.clone();
                tokio::spawn(async move {
                    serve(sock, st, opts).await;
                });
            }
        });

        Self {
            port,
            state,
            handle,
        }
    }

    pub fn config(&self) -> FtpClientConfig {
        FtpClientConfig {
            control_port: self.port,
            timeout_sec: 2,
            ..FtpClientConfig::default()
        }
    }

    pub fn client(&self) -> FtpClient {
        FtpClient::with_config(self.config())
    }

    /// Connected and logged-in client.
    pub async fn ready_client(&self) -> FtpClient {
        let mut client = self.client();
        client.connect("127.0.0.1").await.unwrap();
        let reply = client.login(USER, PASSWORD).await.unwrap();
        assert!(reply.has_status("230"), "login failed: {}", reply);
        client
    }

    pub fn file_names(&self) -> BTreeSet<String> {
        self.state.lock().unwrap().files.keys().cloned().collect()
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.state.lock().unwrap().files.get(path).cloned()
    }

    pub fn keywords(&self) -> Vec<String> {
        self.state.lock().unwrap().keywords()
    }
}

fn resolve(cwd: &str, arg: &str) -> String {
    if arg.starts_with('/') {
        arg.to_string()
    } else if cwd == "/" {
        format!("/{}", arg)
    } else {
        format!("{}/{}", cwd, arg)
    }
}

fn parent(path: &str) -> String {
    match path.rfind('/') {
        Some(0) | None => "/".into(),
        Some(i) => path[..i].to_string(),
    }
}

fn listing(state: &ServerState, dir: &str) -> String {
    let mut out = String::new();
    for d in state.dirs.iter().filter(|d| d.as_str() != "/" && parent(d) == dir) {
        let name = d.rsplit('/').next().unwrap_or_default();
        out.push_str(&format!("drwxr-xr-x 2 ftp ftp 4096 Jan 01 00:00 {}\r\n", name));
    }
    for (path, data) in state.files.iter().filter(|(p, _)| parent(p) == dir) {
        let name = path.rsplit('/').next().unwrap_or_default();
        out.push_str(&format!(
            "-rw-r--r-- 1 ftp ftp {} Jan 01 00:00 {}\r\n",
            data.len(),
            name
        ));
    }
    out
}

async fn send_data(data: Option<TcpStream>, bytes: &[u8]) {
    if let Some(mut d) = data {
        let _ = d.write_all(bytes).await;
        let _ = d.shutdown().await;
    }
}

async fn serve(sock: TcpStream, state: Arc<Mutex<ServerState>>, opts: MockOptions) {
    let (rd, mut wr) = sock.into_split();
    let mut lines = BufReader::new(rd).lines();
    if wr.write_all(&opts.greeting).await.is_err() {
        return;
    }

    let mut data: Option<TcpStream> = None;
    let mut pending_user: Option<String> = None;
    let mut logged_in = false;
    let mut rename_from: Option<String> = None;
    let mut cwd = String::from("/");

    while let Ok(Some(line)) = lines.next_line().await {
        state.lock().unwrap().commands.push(line.clone());
        let (cmd, arg) = match line.split_once(' ') {
            Some((c, a)) => (c.to_ascii_uppercase(), a.to_string()),
            None => (line.to_ascii_uppercase(), String::new()),
        };

        let reply: String = match cmd.as_str() {
            "USER" => {
                pending_user = Some(arg);
                "331 Please specify the password.\r\n".into()
            }
            "PASS" => {
                if pending_user.as_deref() == Some(USER) && arg == PASSWORD {
                    logged_in = true;
                    "230 Login successful.\r\n".into()
                } else {
                    logged_in = false;
                    "530 Login incorrect.\r\n".into()
                }
            }
            "QUIT" => {
                let _ = wr.write_all(b"221 Goodbye.\r\n").await;
                break;
            }
            _ if !logged_in => "530 Please login with USER and PASS.\r\n".into(),
            "EPSV" => {
                let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
                let port = listener.local_addr().unwrap().port();
                let text = opts.epsv_reply.clone().unwrap_or_else(|| {
                    format!("229 Entering Extended Passive Mode (|||{}|)\r\n", port)
                });
                if wr.write_all(text.as_bytes()).await.is_err() {
                    break;
                }
                data = match timeout(Duration::from_secs(2), listener.accept()).await {
                    Ok(Ok((s, _))) => Some(s),
                    _ => None,
                };
                continue;
            }
            "LIST" => {
                let target = if arg.is_empty() { cwd.clone() } else { resolve(&cwd, &arg) };
                let body = {
                    let st = state.lock().unwrap();
                    if st.dirs.contains(&target) {
                        Some(listing(&st, &target))
                    } else {
                        st.files.get(&target).map(|d| {
                            format!("-rw-r--r-- 1 ftp ftp {} Jan 01 00:00 {}\r\n", d.len(), arg)
                        })
                    }
                };
                match body {
                    None => {
                        data = None;
                        "550 No such file or directory.\r\n".into()
                    }
                    Some(body) if opts.merge_completion => {
                        send_data(data.take(), body.as_bytes()).await;
                        "150 Here comes the directory listing.\r\n226 Directory send OK.\r\n".into()
                    }
                    Some(body) => {
                        let _ = wr.write_all(b"150 Here comes the directory listing.\r\n").await;
                        sleep(PRELIMINARY_GAP).await;
                        send_data(data.take(), body.as_bytes()).await;
                        "226 Directory send OK.\r\n".into()
                    }
                }
            }
            "RETR" => {
                let path = resolve(&cwd, &arg);
                let contents = state.lock().unwrap().files.get(&path).cloned();
                match contents {
                    None => {
                        data = None;
                        "550 Failed to open file.\r\n".into()
                    }
                    Some(bytes) => {
                        let _ = wr
                            .write_all(
                                format!("150 Opening BINARY mode data connection ({} bytes).\r\n", bytes.len())
                                    .as_bytes(),
                            )
                            .await;
                        sleep(PRELIMINARY_GAP).await;
                        send_data(data.take(), &bytes).await;
                        "226 Transfer complete.\r\n".into()
                    }
                }
            }
            "STOR" => match data.take() {
                None => "425 Use EPSV first.\r\n".into(),
                Some(mut d) => {
                    let _ = wr.write_all(b"150 Ok to send data.\r\n").await;
                    let mut buf = Vec::new();
                    let _ = d.read_to_end(&mut buf).await;
                    state.lock().unwrap().files.insert(resolve(&cwd, &arg), buf);
                    "226 Transfer complete.\r\n".into()
                }
            },
            "PWD" => format!("257 \"{}\" is the current directory\r\n", cwd),
            "CWD" => {
                let target = resolve(&cwd, &arg);
                if state.lock().unwrap().dirs.contains(&target) {
                    cwd = target;
                    "250 Directory successfully changed.\r\n".into()
                } else {
                    "550 Failed to change directory.\r\n".into()
                }
            }
            "CDUP" => {
                cwd = parent(&cwd);
                "250 Directory successfully changed.\r\n".into()
            }
            "MKD" => {
                let target = resolve(&cwd, &arg);
                if state.lock().unwrap().dirs.insert(target.clone()) {
                    format!("257 \"{}\" created\r\n", target)
                } else {
                    "550 Create directory operation failed.\r\n".into()
                }
            }
            "RMD" => {
                let target = resolve(&cwd, &arg);
                if state.lock().unwrap().dirs.remove(&target) {
                    "250 Remove directory operation successful.\r\n".into()
                } else {
                    "550 Remove directory operation failed.\r\n".into()
                }
            }
            "DELE" => {
                let target = resolve(&cwd, &arg);
                if state.lock().unwrap().files.remove(&target).is_some() {
                    "250 Delete operation successful.\r\n".into()
                } else {
                    "550 Delete operation failed.\r\n".into()
                }
            }
            "RNFR" => {
                let target = resolve(&cwd, &arg);
                if state.lock().unwrap().files.contains_key(&target) {
                    rename_from = Some(target);
                    "350 Ready for RNTO.\r\n".into()
                } else {
                    "550 RNFR command failed.\r\n".into()
                }
            }
            "RNTO" => match rename_from.take() {
                None => "503 RNFR required first.\r\n".into(),
                Some(from) => {
                    let mut st = state.lock().unwrap();
                    let contents = st.files.remove(&from).unwrap_or_default();
                    st.files.insert(resolve(&cwd, &arg), contents);
                    "250 Rename successful.\r\n".into()
                }
            },
            _ => "502 Command not implemented.\r\n".into(),
        };

        if wr.write_all(reply.as_bytes()).await.is_err() {
            break;
        }
    }
}
