use std::{io::Write, net::TcpListener};

use clap::Parser;
use fontserve::{Args, Error, Server};
use fontstore::{Catalog, Paths};
use log::info;

fn main() -> Result<(), Error> {
    env_logger::builder()
        .format(|buf, record| {
            let ts = buf.timestamp_micros();
            writeln!(
                buf,
                "{}: {:?}: {}: {}",
                ts,
                std::thread::current().id(),
                record.level(),
                record.args()
            )
        })
        .init();

    let args = Args::parse();
    let catalog = Catalog::from_file(&args.catalog)?;
    info!("{} fonts in {:?}", catalog.len(), args.catalog);

    let addr = args.bind_addr();
    let listener = TcpListener::bind(&addr).map_err(|source| Error::Bind {
        addr: addr.clone(),
        source,
    })?;
    info!("Listening on http://{addr}");

    let server = Server::new(catalog, Paths::new(&args.font_dir), args.base_url());
    server.run(listener, args.workers);
    Ok(())
}
