//! Network actor - runs HTTP requests in Tokio async runtime

use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::{create_client, execute_draft};

/// Network actor that processes explore commands
pub struct NetworkActor {
    client: reqwest::Client,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(response_tx: mpsc::UnboundedSender<NetworkResponse>, timeout: Duration) -> Self {
        NetworkActor {
            client: create_client(timeout),
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Explore { id, draft }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();

                            // Every explore gets exactly one Completed, failures included
                            self.active_requests.spawn(async move {
                                tracing::info!(id, url = %draft.url, method = %draft.method, "Executing request");
                                let start = Instant::now();
                                let snapshot = execute_draft(&client, &draft).await;
                                let time_ms = start.elapsed().as_millis() as u64;
                                tracing::info!(id, status = snapshot.status, time_ms, "Request completed");
                                let _ = response_tx.send(NetworkResponse::Completed { id, snapshot, time_ms });
                            });
                        }

                        Some(NetworkCommand::Shutdown) => {
                            self.active_requests.abort_all();
                            break;
                        }

                        None => break,
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HttpMethod;
    use crate::request::RequestBuilder;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn spawn_actor() -> (
        mpsc::UnboundedSender<NetworkCommand>,
        mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();
        let actor = NetworkActor::new(resp_tx, Duration::from_secs(5));
        tokio::spawn(actor.run(cmd_rx));
        (cmd_tx, resp_rx)
    }

    #[tokio::test]
    async fn test_explore_completes_with_same_id() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
            .mount(&mock_server)
            .await;

        let (cmd_tx, mut resp_rx) = spawn_actor();
        let draft = RequestBuilder::new(HttpMethod::GET, format!("{}/ping", mock_server.uri()))
            .build(&[])
            .unwrap();
        cmd_tx.send(NetworkCommand::Explore { id: 7, draft }).unwrap();

        let NetworkResponse::Completed { id, snapshot, .. } = resp_rx.recv().await.unwrap();
        assert_eq!(id, 7);
        assert_eq!(snapshot.status, 200);
        assert_eq!(snapshot.body, "pong");

        cmd_tx.send(NetworkCommand::Shutdown).unwrap();
    }

    #[tokio::test]
    async fn test_transport_failure_still_completes() {
        let (cmd_tx, mut resp_rx) = spawn_actor();
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let draft = RequestBuilder::new(HttpMethod::GET, format!("http://127.0.0.1:{}/", port))
            .build(&[])
            .unwrap();
        cmd_tx.send(NetworkCommand::Explore { id: 1, draft }).unwrap();

        let NetworkResponse::Completed { id, snapshot, .. } = resp_rx.recv().await.unwrap();
        assert_eq!(id, 1);
        assert_eq!(snapshot.status, 0);
    }
}
