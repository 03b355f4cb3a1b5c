//! Thin HTTP/1.1 glue over the resolution pipeline.
//!
//! The interesting work happens in `fontstore` and [`crate::archive`]; this
//! module parses a request line, routes the two fonts endpoints, maps the
//! not-found taxonomy to 404, and pumps connections through a fixed worker
//! pool. [`Server::handle`] writes a complete response to any sink, which is
//! what the tests drive directly.

use std::{
    io::{self, BufRead, BufReader, BufWriter, Write},
    net::{TcpListener, TcpStream},
    thread,
};

use fontstore::{bundle, Catalog, Paths};
use log::{debug, error, info, warn};

use crate::{api, archive, error::Error, query};

/// A parsed request line plus its query parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: String,
    pub target: String,
    path: String,
    params: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn new(method: &str, target: &str) -> HttpRequest {
        let (path, raw_query) = match target.split_once('?') {
            Some((path, raw_query)) => (path, Some(raw_query)),
            None => (target, None),
        };
        HttpRequest {
            method: method.to_string(),
            target: target.to_string(),
            path: path.to_string(),
            params: raw_query.map(query::split_query).unwrap_or_default(),
        }
    }

    /// Parse `GET /api/fonts?x=y HTTP/1.1`.
    pub fn from_request_line(line: &str) -> Option<HttpRequest> {
        let mut parts = line.split_whitespace();
        let method = parts.next()?;
        let target = parts.next()?;
        if !parts.next()?.starts_with("HTTP/") {
            return None;
        }
        Some(HttpRequest::new(method, target))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The first value for a query parameter, if present.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

pub struct Server {
    catalog: Catalog,
    paths: Paths,
    base_url: String,
}

impl Server {
    pub fn new(catalog: Catalog, paths: Paths, base_url: impl Into<String>) -> Server {
        Server {
            catalog,
            paths,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Accept connections forever, fanning them out to `workers` threads.
    ///
    /// The bounded channel applies backpressure on accept when every worker
    /// is busy streaming.
    pub fn run(&self, listener: TcpListener, workers: usize) {
        let workers = workers.max(1);
        info!("Serving {} fonts", self.catalog.len());
        let (send, recv) = crossbeam_channel::bounded::<TcpStream>(workers * 2);
        thread::scope(|scope| {
            for _ in 0..workers {
                let recv = recv.clone();
                scope.spawn(move || {
                    for stream in recv.iter() {
                        self.handle_connection(stream);
                    }
                });
            }
            drop(recv);
            for stream in listener.incoming() {
                match stream {
                    Ok(stream) => {
                        if send.send(stream).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("Unable to accept a connection: {e}"),
                }
            }
        });
    }

    fn handle_connection(&self, stream: TcpStream) {
        let read_half = match stream.try_clone() {
            Ok(clone) => clone,
            Err(e) => {
                warn!("Unable to clone a connection: {e}");
                return;
            }
        };
        let mut reader = BufReader::new(read_half);
        let mut line = String::new();
        if reader.read_line(&mut line).is_err() {
            return;
        }
        let mut writer = BufWriter::new(stream);
        let req = match HttpRequest::from_request_line(line.trim_end()) {
            Some(req) => req,
            None => {
                let _ = respond_text(&mut writer, 400, "Bad Request", "Bad request");
                return;
            }
        };
        // Drain the request headers; the GET routes carry no body.
        let mut header = String::new();
        loop {
            header.clear();
            match reader.read_line(&mut header) {
                Ok(0) => break,
                Ok(_) if header == "\r\n" || header == "\n" => break,
                Ok(_) => (),
                Err(_) => return,
            }
        }
        if let Err(e) = self.handle(&req, &mut writer).and_then(|()| writer.flush()) {
            // The client went away; there is nobody left to tell.
            debug!("{} {}: connection closed early: {}", req.method, req.target, e);
        }
    }

    /// Write the full response for one request to `sink`.
    pub fn handle<W: Write>(&self, req: &HttpRequest, sink: &mut W) -> io::Result<()> {
        debug!("{} {}", req.method, req.target);
        if req.method != "GET" {
            return respond_text(sink, 405, "Method Not Allowed", "Not allowed");
        }
        if req.path() == "/api/fonts" {
            return match serde_json::to_vec(&api::list_fonts(&self.catalog)) {
                Ok(body) => respond_json(sink, &body),
                Err(e) => self.respond_error(req, e.into(), sink),
            };
        }
        match req.path().strip_prefix("/api/fonts/") {
            Some(id) if !id.is_empty() && !id.contains('/') => self.font_by_id(id, req, sink),
            _ => respond_not_found(sink),
        }
    }

    fn font_by_id<W: Write>(&self, id: &str, req: &HttpRequest, sink: &mut W) -> io::Result<()> {
        let subsets = query::list_param(req.param("subsets"));
        let bundle = match self.catalog.bundle(id, subsets.as_deref()) {
            Ok(bundle) => bundle,
            Err(e) => return self.respond_error(req, e.into(), sink),
        };
        let variants = match bundle.variants(&self.base_url) {
            Ok(variants) => variants,
            Err(e) => return self.respond_error(req, e.into(), sink),
        };

        if req.param("download") != Some("zip") {
            return match serde_json::to_vec(&api::font_detail(&bundle, variants)) {
                Ok(body) => respond_json(sink, &body),
                Err(e) => self.respond_error(req, e.into(), sink),
            };
        }

        let variant_filter = query::list_param(req.param("variants"));
        let format_filter = query::list_param(req.param("formats"));
        let entries = self.paths.file_entries(&bundle, &variants);
        let entries =
            bundle::filter_files(entries, variant_filter.as_deref(), format_filter.as_deref());
        if entries.is_empty() {
            let err = fontstore::Error::NoMatchingFiles(id.to_string());
            return self.respond_error(req, err.into(), sink);
        }

        let filename = format!(
            "{}-{}-{}.zip",
            bundle.font.id, bundle.font.version, bundle.store_id
        );
        respond_zip_head(sink, &filename)?;
        // The body has started; an error now can only be logged and the
        // connection dropped, leaving the client a truncated archive.
        if let Err(e) = archive::stream_archive(&entries, &mut *sink) {
            error!("{} {}: error while streaming the archive: {}", req.method, req.target, e);
        }
        Ok(())
    }

    fn respond_error<W: Write>(&self, req: &HttpRequest, err: Error, sink: &mut W) -> io::Result<()> {
        if err.is_not_found() {
            debug!("{} {}: {}", req.method, req.target, err);
            respond_not_found(sink)
        } else {
            error!("{} {}: {}", req.method, req.target, err);
            respond_text(sink, 500, "Internal Server Error", "Internal server error")
        }
    }
}

fn respond_text<W: Write>(sink: &mut W, status: u16, reason: &str, body: &str) -> io::Result<()> {
    write!(
        sink,
        "HTTP/1.1 {status} {reason}\r\n\
         Content-Type: text/plain; charset=utf-8\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\r\n{body}",
        body.len()
    )
}

fn respond_not_found<W: Write>(sink: &mut W) -> io::Result<()> {
    respond_text(sink, 404, "Not Found", "Not found")
}

fn respond_json<W: Write>(sink: &mut W, body: &[u8]) -> io::Result<()> {
    write!(
        sink,
        "HTTP/1.1 200 OK\r\n\
         Content-Type: application/json; charset=utf-8\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\r\n",
        body.len()
    )?;
    sink.write_all(body)
}

/// The zip body is streamed with no known length, so the response is
/// close-delimited.
fn respond_zip_head<W: Write>(sink: &mut W, filename: &str) -> io::Result<()> {
    write!(
        sink,
        "HTTP/1.1 200 OK\r\n\
         Content-Type: application/zip\r\n\
         Content-Disposition: attachment; filename={filename}\r\n\
         Connection: close\r\n\r\n"
    )
}
