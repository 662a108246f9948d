use crate::http::request::Request;
use crate::http::writer::ResponseWriter;

/// Anything that can answer a request.
///
/// Plain functions and closures taking `&Request` get this for free; stateful
/// types implement it directly. The request is passed mutably so a router can
/// bind path captures before delegating. A handler signals completion by
/// calling [`ResponseWriter::send`] or by writing raw bytes.
pub trait Handler: Send + Sync {
    fn serve(&self, w: &mut ResponseWriter, req: &mut Request);
}

impl<F> Handler for F
where
    F: Fn(&mut ResponseWriter, &Request) + Send + Sync,
{
    fn serve(&self, w: &mut ResponseWriter, req: &mut Request) {
        self(w, &*req)
    }
}
