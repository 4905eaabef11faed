//! Command-line surface of the marketplace.
//!
//! Renders fetched rows and forwards form input; every decision lives in
//! the library. Backend coordinates come from `SUPABASE_URL` and
//! `SUPABASE_ANON_KEY` (a `.env` file is honored).

use clap::{Arg, ArgMatches, Command};
use dotenv::dotenv;
use uuid::Uuid;

use kerala_classifieds::ads::ImageUpload;
use kerala_classifieds::auth::Session;
use kerala_classifieds::error::Error;
use kerala_classifieds::favorites::FavoriteToggle;
use kerala_classifieds::forms::{AdForm, SignInForm, SignUpForm};
use kerala_classifieds::listings::{ListingQuery, SortKey};
use kerala_classifieds::models::{AdSummary, PriceType};
use kerala_classifieds::Marketplace;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    if let Err(error) = run().await {
        eprintln!("{}", error);
        std::process::exit(1);
    }
}

fn cli() -> Command<'static> {
    let email = Arg::new("email")
        .long("email")
        .takes_value(true)
        .help("Account email");
    let password = Arg::new("password")
        .long("password")
        .takes_value(true)
        .help("Account password");

    Command::new("classifieds")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Regional classifieds marketplace")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("listings")
                .about("Browse approved listings")
                .arg(
                    Arg::new("query")
                        .long("query")
                        .short('q')
                        .takes_value(true)
                        .help("Free-text search over title and description"),
                )
                .arg(
                    Arg::new("category")
                        .long("category")
                        .takes_value(true)
                        .help("Category id"),
                )
                .arg(
                    Arg::new("location")
                        .long("location")
                        .takes_value(true)
                        .help("Location id"),
                )
                .arg(
                    Arg::new("sort")
                        .long("sort")
                        .takes_value(true)
                        .help("newest | oldest | price_low | price_high"),
                ),
        )
        .subcommand(
            Command::new("show")
                .about("Show one listing in full")
                .arg(Arg::new("ad").takes_value(true).required(true).help("Ad id")),
        )
        .subcommand(Command::new("categories").about("List active categories"))
        .subcommand(Command::new("locations").about("List locations"))
        .subcommand(
            Command::new("post-ad")
                .about("Post a new ad (goes live after approval)")
                .arg(email.clone().required(true))
                .arg(password.clone().required(true))
                .arg(Arg::new("title").long("title").takes_value(true).required(true))
                .arg(
                    Arg::new("description")
                        .long("description")
                        .takes_value(true)
                        .required(true),
                )
                .arg(Arg::new("price").long("price").takes_value(true))
                .arg(
                    Arg::new("price-type")
                        .long("price-type")
                        .takes_value(true)
                        .help("fixed | negotiable | on_request"),
                )
                .arg(
                    Arg::new("category")
                        .long("category")
                        .takes_value(true)
                        .required(true)
                        .help("Category id"),
                )
                .arg(
                    Arg::new("location")
                        .long("location")
                        .takes_value(true)
                        .required(true)
                        .help("Location id"),
                )
                .arg(Arg::new("contact-phone").long("contact-phone").takes_value(true))
                .arg(Arg::new("contact-email").long("contact-email").takes_value(true))
                .arg(
                    Arg::new("image")
                        .long("image")
                        .takes_value(true)
                        .multiple_occurrences(true)
                        .help("Image file to attach (up to 5)"),
                ),
        )
        .subcommand(
            Command::new("my-ads")
                .about("Your posted ads")
                .arg(email.clone().required(true))
                .arg(password.clone().required(true)),
        )
        .subcommand(
            Command::new("favorites")
                .about("Your saved ads")
                .arg(email.clone().required(true))
                .arg(password.clone().required(true)),
        )
        .subcommand(
            Command::new("favorite")
                .about("Save or unsave an ad")
                .arg(Arg::new("ad").takes_value(true).required(true).help("Ad id"))
                .arg(email.clone())
                .arg(password.clone()),
        )
        .subcommand(
            Command::new("delete-ad")
                .about("Delete one of your ads")
                .arg(Arg::new("ad").takes_value(true).required(true).help("Ad id"))
                .arg(email.clone().required(true))
                .arg(password.clone().required(true)),
        )
        .subcommand(
            Command::new("sign-up")
                .about("Create an account")
                .arg(email.clone().required(true))
                .arg(password.clone().required(true))
                .arg(
                    Arg::new("confirm-password")
                        .long("confirm-password")
                        .takes_value(true)
                        .required(true),
                )
                .arg(
                    Arg::new("full-name")
                        .long("full-name")
                        .takes_value(true)
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("sign-in")
                .about("Check your credentials")
                .arg(email.required(true))
                .arg(password.required(true)),
        )
}

async fn run() -> Result<(), Error> {
    let matches = cli().get_matches();
    let app = Marketplace::from_env()?;

    match matches.subcommand() {
        Some(("listings", sub)) => listings(&app, sub).await,
        Some(("show", sub)) => show(&app, sub).await,
        Some(("categories", _)) => categories(&app).await,
        Some(("locations", _)) => locations(&app).await,
        Some(("post-ad", sub)) => post_ad(&app, sub).await,
        Some(("my-ads", sub)) => my_ads(&app, sub).await,
        Some(("favorites", sub)) => favorites(&app, sub).await,
        Some(("favorite", sub)) => favorite(&app, sub).await,
        Some(("delete-ad", sub)) => delete_ad(&app, sub).await,
        Some(("sign-up", sub)) => sign_up(&app, sub).await,
        Some(("sign-in", sub)) => sign_in(&app, sub).await.map(|session| {
            println!(
                "Signed in as {}",
                session.email.as_deref().unwrap_or("(no email)")
            );
        }),
        _ => Ok(()),
    }
}

fn arg(matches: &ArgMatches, name: &str) -> Option<String> {
    matches.get_one::<String>(name).cloned()
}

fn uuid_arg(matches: &ArgMatches, name: &str) -> Result<Option<Uuid>, Error> {
    match arg(matches, name) {
        Some(value) => Uuid::parse_str(&value)
            .map(Some)
            .map_err(|_| Error::general(format!("'{}' is not a valid {} id", value, name))),
        None => Ok(None),
    }
}

async fn sign_in(app: &Marketplace, matches: &ArgMatches) -> Result<Session, Error> {
    let form = SignInForm {
        email: arg(matches, "email").unwrap_or_default(),
        password: arg(matches, "password").unwrap_or_default(),
    };
    app.auth().sign_in(&form).await
}

async fn listings(app: &Marketplace, matches: &ArgMatches) -> Result<(), Error> {
    let query = ListingQuery {
        search: arg(matches, "query"),
        category_id: uuid_arg(matches, "category")?,
        location_id: uuid_arg(matches, "location")?,
        sort: SortKey::parse(arg(matches, "sort").as_deref()),
    };

    let ads = app.listings().search(&query).await?;
    if ads.is_empty() {
        println!("No ads found. Try adjusting your search criteria.");
        return Ok(());
    }

    println!(
        "{} {} found",
        ads.len(),
        if ads.len() == 1 { "result" } else { "results" }
    );
    for ad in &ads {
        render_listing(ad);
    }
    Ok(())
}

async fn show(app: &Marketplace, matches: &ArgMatches) -> Result<(), Error> {
    let ad_id = uuid_arg(matches, "ad")?.ok_or_else(|| Error::general("an ad id is required"))?;

    match app.listings().get(ad_id).await? {
        None => println!("No approved ad with that id."),
        Some(ad) => {
            render_listing(&ad);
            println!("    {}", ad.ad.description);
            if let Some(phone) = &ad.ad.contact_phone {
                println!("    Contact: {}", phone);
            }
            if let Some(email) = &ad.ad.contact_email {
                println!("    Email: {}", email);
            }
            if let Some(seller) = ad.profiles.as_ref().and_then(|p| p.full_name.as_deref()) {
                println!("    Seller: {}", seller);
            }
            println!("    {} views", ad.ad.view_count);
        }
    }
    Ok(())
}

async fn categories(app: &Marketplace) -> Result<(), Error> {
    for category in app.listings().categories().await? {
        println!("{}  {} ({})", category.id, category.name, category.slug);
    }
    Ok(())
}

async fn locations(app: &Marketplace) -> Result<(), Error> {
    for location in app.listings().locations().await? {
        println!("{}  {}, {}", location.id, location.city, location.district);
    }
    Ok(())
}

async fn post_ad(app: &Marketplace, matches: &ArgMatches) -> Result<(), Error> {
    let session = sign_in(app, matches).await?;

    let category_id = uuid_arg(matches, "category")?
        .ok_or_else(|| Error::general("a category id is required"))?;
    let location_id = uuid_arg(matches, "location")?
        .ok_or_else(|| Error::general("a location id is required"))?;

    let form = AdForm {
        title: arg(matches, "title").unwrap_or_default(),
        description: arg(matches, "description").unwrap_or_default(),
        price: arg(matches, "price").filter(|p| !p.is_empty()),
        price_type: PriceType::parse(arg(matches, "price-type").as_deref()),
        category_id,
        location_id,
        contact_phone: arg(matches, "contact-phone"),
        contact_email: arg(matches, "contact-email").filter(|e| !e.is_empty()),
    };

    let images = match matches.get_many::<String>("image") {
        Some(paths) => read_images(paths.cloned().collect())?,
        None => Vec::new(),
    };

    let ad = app.ads().post(&session, &form, &images).await?;
    println!("Ad posted successfully!");
    println!("\"{}\" is now pending approval and will be live soon.", ad.title);
    println!("See it under `classifieds my-ads`.");
    Ok(())
}

fn read_images(paths: Vec<String>) -> Result<Vec<ImageUpload>, Error> {
    paths
        .into_iter()
        .map(|path| {
            let data = std::fs::read(&path)
                .map_err(|err| Error::general(format!("could not read {}: {}", path, err)))?;
            let file_name = path.rsplit('/').next().unwrap_or(&path).to_string();
            Ok(ImageUpload {
                content_type: guess_content_type(&file_name),
                file_name,
                data,
            })
        })
        .collect()
}

fn guess_content_type(file_name: &str) -> Option<String> {
    let extension = file_name.rsplit('.').next()?.to_ascii_lowercase();
    let mime = match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => return None,
    };
    Some(mime.to_string())
}

async fn my_ads(app: &Marketplace, matches: &ArgMatches) -> Result<(), Error> {
    let session = sign_in(app, matches).await?;
    let ads = app.ads().mine(&session).await?;

    if ads.is_empty() {
        println!("No ads posted yet. Start by posting your first ad.");
        return Ok(());
    }

    println!("My Ads ({})", ads.len());
    for ad in &ads {
        println!(
            "{}  [{}] {}  {}  {} views",
            ad.ad.id,
            ad.ad.status.label(),
            ad.ad.title,
            format_price(ad.ad.price, ad.ad.price_type),
            ad.ad.view_count,
        );
    }
    Ok(())
}

async fn favorites(app: &Marketplace, matches: &ArgMatches) -> Result<(), Error> {
    let session = sign_in(app, matches).await?;
    let favorites = app.favorites().list(&session).await?;

    if favorites.is_empty() {
        println!("No favorites yet. Save ads you're interested in.");
        return Ok(());
    }

    println!("Favorites ({})", favorites.len());
    for favorite in &favorites {
        match &favorite.ads {
            Some(ad) => println!(
                "{}  {}  {}",
                favorite.favorite.id,
                ad.ad.title,
                format_price(ad.ad.price, ad.ad.price_type),
            ),
            None => println!("{}  (ad no longer available)", favorite.favorite.id),
        }
    }
    Ok(())
}

async fn favorite(app: &Marketplace, matches: &ArgMatches) -> Result<(), Error> {
    let ad_id = uuid_arg(matches, "ad")?.ok_or_else(|| Error::general("an ad id is required"))?;

    let session = match (arg(matches, "email"), arg(matches, "password")) {
        (Some(_), Some(_)) => Some(sign_in(app, matches).await?),
        _ => None,
    };

    match app.favorites().toggle(session.as_ref(), ad_id).await? {
        FavoriteToggle::Added => println!("Added to favorites"),
        FavoriteToggle::Removed => println!("Removed from favorites"),
    }
    Ok(())
}

async fn delete_ad(app: &Marketplace, matches: &ArgMatches) -> Result<(), Error> {
    let session = sign_in(app, matches).await?;
    let ad_id = uuid_arg(matches, "ad")?.ok_or_else(|| Error::general("an ad id is required"))?;

    app.ads().delete(&session, ad_id).await?;
    println!("Ad deleted successfully");
    Ok(())
}

async fn sign_up(app: &Marketplace, matches: &ArgMatches) -> Result<(), Error> {
    let form = SignUpForm {
        email: arg(matches, "email").unwrap_or_default(),
        password: arg(matches, "password").unwrap_or_default(),
        confirm_password: arg(matches, "confirm-password").unwrap_or_default(),
        full_name: arg(matches, "full-name").unwrap_or_default(),
    };

    let response = app.auth().sign_up(&form).await?;
    match response.session() {
        Some(_) => println!("Account created. You are ready to sign in."),
        None => println!("Account created. Check your email to confirm the address."),
    }
    Ok(())
}

fn render_listing(ad: &AdSummary) {
    println!(
        "{}  {}{}",
        ad.ad.id,
        ad.ad.title,
        if ad.ad.is_featured { "  [Featured]" } else { "" }
    );
    if let Some(category) = &ad.categories {
        println!("    {}", category.name);
    }
    println!("    {}", format_price(ad.ad.price, ad.ad.price_type));
    if let Some(location) = &ad.locations {
        println!("    {}, {}", location.city, location.district);
    }
    println!("    posted {}", ad.ad.created_at.format("%d %b %Y"));
}

fn format_price(price: Option<f64>, price_type: PriceType) -> String {
    match price {
        None => "Price on request".to_string(),
        Some(price) if price_type == PriceType::Negotiable => {
            format!("₹{} (Negotiable)", format_amount(price))
        }
        Some(price) => format!("₹{}", format_amount(price)),
    }
}

fn format_amount(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{}", price as i64)
    } else {
        format!("{:.2}", price)
    }
}
