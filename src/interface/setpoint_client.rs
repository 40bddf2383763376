// This file is part of vent_controller.
//
// See the COPYRIGHT file at the top-level directory of this distribution
// for details of code ownership.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use log::{debug, info};
use std::net::ToSocketAddrs;
use std::time::Duration;
use ureq::{Agent, AgentBuilder, Request};

use crate::constants::{QUERY_KEY_TEMPERATURE, QUERY_KEY_TOKEN};
use crate::error::ControllerError;

/// Remote service that stores the measured temperature and holds the desired
/// temperature of the user.
pub trait SetpointService {
    /// Get ready for the exchanges. Called once at startup.
    fn connect(&mut self) -> Result<(), ControllerError>;

    /// Report the measured temperature and get the setpoint back. A single
    /// attempt without retry.
    ///
    /// # Arguments
    /// * `measured` - Measured temperature in degree Celsius.
    ///
    /// # Returns
    /// Setpoint in degree Celsius.
    fn exchange(&mut self, measured: i32) -> Result<i32, ControllerError>;
}

/// Parse the setpoint from the body of the response.
///
/// # Arguments
/// * `body` - Body of the response.
///
/// # Returns
/// Setpoint in degree Celsius.
pub fn parse_setpoint(body: &str) -> Result<i32, ControllerError> {
    body.trim()
        .parse::<i32>()
        .map_err(|_| ControllerError::MalformedSetpoint {
            body: body.to_string(),
        })
}

/// Build the setpoint request. The query values are percent-encoded.
///
/// # Arguments
/// * `agent` - Agent of the HTTP client.
/// * `endpoint` - URL of the setpoint service.
/// * `token` - Access token. None if not needed.
/// * `measured` - Measured temperature in degree Celsius.
///
/// # Returns
/// Request to send.
pub fn build_request(
    agent: &Agent,
    endpoint: &str,
    token: Option<&str>,
    measured: i32,
) -> Request {
    let request = agent.get(endpoint);
    let request = match token {
        Some(token) => request.query(QUERY_KEY_TOKEN, token),
        None => request,
    };

    request.query(QUERY_KEY_TEMPERATURE, &measured.to_string())
}

/// Get the "host:port" part of the endpoint.
///
/// # Arguments
/// * `endpoint` - URL of the setpoint service.
///
/// # Returns
/// Host and port.
fn get_host_port(endpoint: &str) -> Result<String, ControllerError> {
    let (rest, default_port) = if let Some(rest) = endpoint.strip_prefix("http://") {
        (rest, 80)
    } else if let Some(rest) = endpoint.strip_prefix("https://") {
        (rest, 443)
    } else {
        return Err(ControllerError::ConnectionFailed(format!(
            "{endpoint} is not an HTTP endpoint"
        )));
    };

    let authority = rest.split(['/', '?']).next().unwrap_or_default();
    if authority.is_empty() {
        return Err(ControllerError::ConnectionFailed(format!(
            "{endpoint} has no host"
        )));
    }

    if authority.contains(':') {
        Ok(authority.to_string())
    } else {
        Ok(format!("{authority}:{default_port}"))
    }
}

/// Setpoint service reached by a plain HTTP GET.
pub struct HttpSetpointClient {
    _endpoint: String,
    _token: Option<String>,
    _timeout: Option<Duration>,
    _agent: Option<Agent>,
}

impl HttpSetpointClient {
    /// Create a new HTTP setpoint client.
    ///
    /// # Arguments
    /// * `endpoint` - URL of the setpoint service.
    /// * `token` - Access token. None if not needed.
    /// * `timeout` - Timeout of the request. None to use the default of the
    /// transport.
    ///
    /// # Returns
    /// A new HTTP setpoint client.
    pub fn new(endpoint: &str, token: Option<&str>, timeout: Option<Duration>) -> Self {
        Self {
            _endpoint: endpoint.trim().to_string(),
            _token: token.map(String::from),
            _timeout: timeout,
            _agent: None,
        }
    }
}

impl SetpointService for HttpSetpointClient {
    fn connect(&mut self) -> Result<(), ControllerError> {
        if self._endpoint.is_empty() {
            return Err(ControllerError::NoNetworkInterface(String::from(
                "no setpoint endpoint is configured",
            )));
        }

        let host_port = get_host_port(&self._endpoint)?;
        let number_of_addresses = host_port
            .to_socket_addrs()
            .map_err(|error| ControllerError::ConnectionFailed(format!("{host_port}: {error}")))?
            .count();
        if number_of_addresses == 0 {
            return Err(ControllerError::ConnectionFailed(format!(
                "{host_port} has no address"
            )));
        }

        let mut builder = AgentBuilder::new();
        if let Some(timeout) = self._timeout {
            builder = builder.timeout(timeout);
        }
        self._agent = Some(builder.build());

        info!("Setpoint service is at {host_port}.");

        Ok(())
    }

    fn exchange(&mut self, measured: i32) -> Result<i32, ControllerError> {
        let agent = self._agent.as_ref().ok_or_else(|| {
            ControllerError::RequestFailed(String::from("setpoint service is not connected"))
        })?;

        debug!("Report the measured temperature {measured} to the setpoint service.");

        let request = build_request(agent, &self._endpoint, self._token.as_deref(), measured);
        match request.call() {
            Ok(response) => {
                let body = response.into_string().map_err(|error| {
                    ControllerError::RequestFailed(format!("Failed to read the body: {error}"))
                })?;

                parse_setpoint(&body)
            }
            Err(ureq::Error::Status(code, _)) => Err(ControllerError::RequestFailed(format!(
                "setpoint service returns the status {code}"
            ))),
            Err(ureq::Error::Transport(transport)) => {
                Err(ControllerError::RequestFailed(transport.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread::{spawn, JoinHandle};

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    /// Serve a single request with the response.
    ///
    /// # Returns
    /// Endpoint of the server and the handle that returns the request line.
    fn spawn_server(response: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Tcp listener should bind.");
        let port = listener.local_addr().unwrap().port();

        let handle = spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();

            // Drain the headers
            loop {
                let mut line = String::new();
                let size = reader.read_line(&mut line).unwrap();
                if size == 0 || line == "\r\n" {
                    break;
                }
            }

            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();

            request_line.trim_end().to_string()
        });

        (format!("http://127.0.0.1:{port}/api.php"), handle)
    }

    fn create_client(endpoint: &str, token: Option<&str>) -> HttpSetpointClient {
        let mut client =
            HttpSetpointClient::new(endpoint, token, Some(Duration::from_millis(2000)));
        client.connect().expect("Should connect to the local endpoint.");

        client
    }

    #[test]
    fn test_parse_setpoint() {
        assert_eq!(parse_setpoint("22"), Ok(22));
        assert_eq!(parse_setpoint(" 19\r\n"), Ok(19));
        assert_eq!(parse_setpoint("-3"), Ok(-3));
        assert_eq!(parse_setpoint("+4"), Ok(4));

        assert_eq!(
            parse_setpoint("22.5"),
            Err(ControllerError::MalformedSetpoint {
                body: String::from("22.5")
            })
        );
        assert!(parse_setpoint("").is_err());
        assert!(parse_setpoint("<html>").is_err());
    }

    fn get_query_pairs(request: &Request) -> Vec<(String, String)> {
        request
            .request_url()
            .unwrap()
            .query_pairs()
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_build_request() {
        let agent = AgentBuilder::new().build();

        let request = build_request(&agent, "http://host/api.php", Some("abc"), 21);
        assert_eq!(request.url(), "http://host/api.php?token=abc&temp=21");

        let request = build_request(&agent, "http://host/api.php", None, -2);
        assert_eq!(request.url(), "http://host/api.php?temp=-2");

        let request = build_request(&agent, "http://host/api.php?site=1", None, 20);
        assert_eq!(
            get_query_pairs(&request),
            vec![
                (String::from("site"), String::from("1")),
                (String::from("temp"), String::from("20"))
            ]
        );
    }

    #[test]
    fn test_build_request_reserved_token() {
        let agent = AgentBuilder::new().build();
        let request = build_request(&agent, "http://host/api.php", Some("a&temp=99"), 21);

        assert_eq!(request.url().matches("temp=").count(), 1);
        assert_eq!(
            get_query_pairs(&request),
            vec![
                (String::from("token"), String::from("a&temp=99")),
                (String::from("temp"), String::from("21"))
            ]
        );
    }

    #[test]
    fn test_get_host_port() {
        assert_eq!(
            get_host_port("http://example.com/api.php"),
            Ok(String::from("example.com:80"))
        );
        assert_eq!(
            get_host_port("https://example.com?x=1"),
            Ok(String::from("example.com:443"))
        );
        assert_eq!(
            get_host_port("http://127.0.0.1:8080/api.php"),
            Ok(String::from("127.0.0.1:8080"))
        );

        assert!(get_host_port("ftp://example.com").is_err());
        assert!(get_host_port("http:///api.php").is_err());
    }

    #[test]
    fn test_connect_no_endpoint() {
        let mut client = HttpSetpointClient::new("  ", None, None);

        assert!(matches!(
            client.connect(),
            Err(ControllerError::NoNetworkInterface(_))
        ));
        assert!(client._agent.is_none());
    }

    #[test]
    fn test_connect_bad_endpoint() {
        let mut client = HttpSetpointClient::new("localhost/api.php", None, None);

        assert!(matches!(
            client.connect(),
            Err(ControllerError::ConnectionFailed(_))
        ));
    }

    #[test]
    fn test_connect_unresolvable_host() {
        let mut client = HttpSetpointClient::new("http://vent.invalid/api.php", None, None);

        assert!(matches!(
            client.connect(),
            Err(ControllerError::ConnectionFailed(_))
        ));
        assert!(client._agent.is_none());
    }

    #[test]
    fn test_exchange_not_connected() {
        let mut client = HttpSetpointClient::new("http://127.0.0.1/api.php", None, None);

        assert!(matches!(
            client.exchange(20),
            Err(ControllerError::RequestFailed(_))
        ));
    }

    #[test]
    fn test_exchange() {
        let (endpoint, handle) = spawn_server(http_response("200 OK", "22\n"));
        let mut client = create_client(&endpoint, Some("abc"));

        assert_eq!(client.exchange(18), Ok(22));
        assert_eq!(
            handle.join().unwrap(),
            "GET /api.php?token=abc&temp=18 HTTP/1.1"
        );
    }

    #[test]
    fn test_exchange_malformed() {
        let (endpoint, handle) = spawn_server(http_response("200 OK", "warm"));
        let mut client = create_client(&endpoint, None);

        assert_eq!(
            client.exchange(18),
            Err(ControllerError::MalformedSetpoint {
                body: String::from("warm")
            })
        );
        assert!(handle.join().is_ok());
    }

    #[test]
    fn test_exchange_status() {
        let (endpoint, handle) = spawn_server(http_response("500 Internal Server Error", ""));
        let mut client = create_client(&endpoint, None);

        assert!(matches!(
            client.exchange(18),
            Err(ControllerError::RequestFailed(_))
        ));
        assert!(handle.join().is_ok());
    }

    #[test]
    fn test_exchange_transport_failure() {
        // Take a free port and close it again.
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let mut client = create_client(&format!("http://127.0.0.1:{port}/api.php"), None);

        assert!(matches!(
            client.exchange(18),
            Err(ControllerError::RequestFailed(_))
        ));
    }
}
