use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver};
use std::thread;

/// One canned response, matched against the request path prefix.
pub struct Route {
    pub path: &'static str,
    pub status: u16,
    pub body: String,
}

impl Route {
    pub fn ok(path: &'static str, body: impl Into<String>) -> Self {
        Self {
            path,
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(path: &'static str, status: u16, body: impl Into<String>) -> Self {
        Self {
            path,
            status,
            body: body.into(),
        }
    }
}

/// Serve `connections` requests on a local port. Returns the base URL and a
/// receiver yielding each request target (`/api/...?...`) in arrival order.
pub fn serve(routes: Vec<Route>, connections: usize) -> (String, Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for _ in 0..connections {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let target = read_target(&mut stream);
            let route = routes.iter().find(|route| target.starts_with(route.path));
            let response = match route {
                Some(route) => response(route.status, &route.body),
                None => response(404, "Not Found"),
            };
            let _ = stream.write_all(response.as_bytes());
            let _ = tx.send(target);
        }
    });
    (format!("http://{addr}"), rx)
}

/// Serve a single response regardless of the path.
pub fn serve_once(status: u16, body: impl Into<String>) -> (String, Receiver<String>) {
    serve(vec![Route::status("/", status, body)], 1)
}

fn read_target(stream: &mut TcpStream) -> String {
    let mut buf = [0u8; 4096];
    let read = stream.read(&mut buf).unwrap_or(0);
    let request = String::from_utf8_lossy(&buf[..read]);
    request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or_default()
        .to_string()
}

fn response(status: u16, body: &str) -> String {
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        _ => "Internal Server Error",
    };
    format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

pub const KNN_BODY: &str = r#"{
    "success": true,
    "feature_names": ["sepal length", "sepal width", "petal length", "petal width"],
    "target_names": ["setosa", "versicolor", "virginica"],
    "current_features": {"x": "petal length", "y": "petal width", "x_idx": 2, "y_idx": 3},
    "k_neighbors": 7,
    "data": {
        "train": {"x": [1.4, 4.7, 6.0], "y": [0.2, 1.4, 2.5], "labels": [0, 1, 2]},
        "test": {"x": [1.5, 5.1], "y": [0.3, 1.8], "labels": [0, 1], "predictions": [0, 2]}
    },
    "metrics": {"accuracy": 0.5, "confusion_matrix": [[1, 0, 0], [0, 0, 1], [0, 0, 0]]},
    "description": {"dataset": "Iris", "samples": 5, "train_size": 3, "test_size": 2, "classes": 3}
}"#;

pub const REGRESSION_BODY: &str = r#"{
    "success": true,
    "data": {
        "train": {"x": [5.0, 6.0, 7.0], "y": [150.0, 200.0, 250.0]},
        "test": {"x": [6.5], "y": [230.0], "y_pred": [225.0]},
        "regression_line": {"x": [4.0, 8.0], "y": [100.0, 300.0]}
    },
    "metrics": {"r2_score": 0.82, "mse": 120.5, "rmse": 10.98, "coefficient": 50.0, "intercept": -100.0},
    "description": {
        "dataset": "California housing",
        "samples": 4,
        "train_size": 3,
        "test_size": 1,
        "feature_name": "Average rooms",
        "target_name": "Median price",
        "target_unit": "k$"
    }
}"#;
