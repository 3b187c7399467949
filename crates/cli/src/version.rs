use crate::session::Session;
use std::cmp::Ordering;

pub fn compare(a: &str, b: &str) -> Result<(), Box<dyn std::error::Error>> {
    let sign = match pigment_core::version::compare(a, b)? {
        Ordering::Less => "<",
        Ordering::Equal => "=",
        Ordering::Greater => ">",
    };
    println!("{} {} {}", a, sign, b);
    Ok(())
}

pub async fn latest(session: &Session, edition: &str) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = session.load_catalog()?;
    let versions = catalog.version_source().read().await?;
    println!("{}", versions.latest(edition)?);
    Ok(())
}
