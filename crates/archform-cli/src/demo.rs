//! The InPlacer content storage model.

use archform_core::{
    tags, ElementStyle, Format, InteractionStyle, Location, ModelError, PaperSize,
    RelationshipStyle, Routing, Shape, Workspace, WorkspaceBuilder,
};

pub const MICROSERVICE_TAG: &str = "Microservice";
pub const MESSAGE_BUS_TAG: &str = "Message Bus";
pub const DATA_STORE_TAG: &str = "Database";

const CRUD: &str =
    "Allows users to view stored content and manage their own content (add, change, delete, attach tags etc.).";

pub fn inplacer() -> Result<Workspace, ModelError> {
    let mut b = WorkspaceBuilder::new("Context", "This is a model of InPlacer content storage.");

    let guest = b.add_person("Unauthorized user", "A user before an authorization.")?;
    let user = b.add_person("Authorized user", "A user after an authorization.")?;
    let system = b.add_software_system(
        Location::Internal,
        "InPlacer System",
        "System for storing content",
    )?;
    b.uses(&guest, &system, "Uses")?;
    b.uses(&user, &system, "Uses")?;

    let customer = b.add_person("Customer", "A user of the system.")?;

    let oauth = b.add_software_system(
        Location::External,
        "OAuth0.com",
        "SAAS for authentication using OAuth protocol.",
    )?;
    b.uses(&system, &oauth, "Uses")?;
    let web_sites = b.add_software_system(
        Location::External,
        "External Web",
        "A huge number of Web-sites which will be grubed when new link URL get from customer.",
    )?;
    b.uses(&system, &web_sites, "Uses")?;

    let web_app = b.add_container(
        &system,
        "Web Application",
        CRUD,
        "ASP.NET Core 2.x, Nginx, React JS/Redux, Bootstrap, NLog",
    )?;
    let chrome_ext = b.add_container(
        &system,
        "Chrome Extension",
        "Allows users to add link URL to the content to the InPlacer System.",
        "JavaScript",
    )?;
    let mobile_app = b.add_container(&system, "Android Application", CRUD, "Java, Android SDK")?;
    for client in [&web_app, &chrome_ext, &mobile_app] {
        for person in [&guest, &user, &customer] {
            b.uses(person, client, "Uses [HTTPS]")?;
        }
    }

    let web_api = b.add_container(
        &system,
        "Web API",
        "The entry point for all interactions with backend part of the system.",
        "ASP.NET Core 2.x, Nginx, MongoDB.Driver, Elastic.Driver, RabbitMQ.Driver, InflaxData.Driver etc.",
    )?;
    b.add_tag(&web_api, MICROSERVICE_TAG)?;
    b.uses(&web_app, &web_api, "Uses [HTTP]")?;
    b.uses(&chrome_ext, &web_api, "Uses [HTTPS]")?;
    b.uses(&mobile_app, &web_api, "Uses [HTTPS]")?;
    b.uses(&web_api, &oauth, "Uses [HTTPS]")?;

    let accounts = b.add_component(
        &web_api,
        "AccountController",
        "Authentication and Authorization functionality",
    )?;
    let links = b.add_component(
        &web_api,
        "LinkController",
        "Works with links which customers put from any devices",
    )?;
    let contents = b.add_component(&web_api, "ContentController", "Manages contents")?;
    for controller in [&accounts, &links, &contents] {
        b.uses(&customer, controller, "Uses")?;
    }

    let db_context = b.add_component(&web_api, "DatabaseContext", "Uses for working with database")?;
    b.uses(&accounts, &oauth, "Uses")?;
    for controller in [&accounts, &links, &contents] {
        b.uses(controller, &db_context, "Uses")?;
    }

    let mongo = b.add_container(
        &system,
        "NoSQL Data Store",
        "Stores content and metadata of the content (URL, keywords, tags etc.).",
        "MongoDB 3.6.x",
    )?;
    b.add_tag(&mongo, DATA_STORE_TAG)?;
    b.uses(&web_api, &mongo, "Uses [HTTP]")?;
    b.uses(&db_context, &mongo, "Reads from and Writes to")?;

    let elastic = b.add_container(
        &system,
        "Indexing system",
        "Indexes incoming content for future analysis opportunity.",
        "Elastic Search 5.x",
    )?;
    b.add_tag(&elastic, DATA_STORE_TAG)?;
    b.uses(&web_api, &elastic, "Uses [HTTP]")?;

    let bus = b.add_container(
        &system,
        "Message Bus",
        "Transport for business events",
        "RabbitMQ 3.7.x",
    )?;
    b.add_tag(&bus, MESSAGE_BUS_TAG)?;
    b.uses_with(&web_api, &bus, "Uses [HTTP]", None, InteractionStyle::Asynchronous)?;

    let worker = b.add_container(
        &system,
        "Operational service",
        "Works background, interracts with queue and indexing systems for make some delayed work.",
        "dotnet core 2.x",
    )?;
    b.add_tag(&worker, MICROSERVICE_TAG)?;
    b.uses(&worker, &mongo, "Uses [HTTP]")?;
    b.uses(&bus, &worker, "Uses [HTTP]")?;
    b.uses(&worker, &web_sites, "Uses [HTTPS]")?;

    let monitoring = b.add_container(
        &system,
        "Monitoring",
        "Adds support of the monitoring.",
        "Kibana",
    )?;
    b.add_tag(&monitoring, MICROSERVICE_TAG)?;
    b.uses(&web_api, &monitoring, "Uses [HTTP]")?;
    b.uses(&monitoring, &elastic, "Uses [HTTP]")?;

    b.create_system_context_view(
        &system,
        "SystemContext",
        "System Context diagram for InPlacer content storage.",
    )?
    .paper_size(PaperSize::A4Landscape)
    .add_all_software_systems()
    .add(&user)?
    .add(&guest)?;

    b.create_container_view(
        &system,
        "SystemContainer",
        "System Container diagram for InPlacer content storage",
    )?
    .paper_size(PaperSize::A4Landscape)
    .add(&customer)?
    .add_all_containers()
    .add(&oauth)?
    .add(&web_sites)?;

    let mut components = b.create_component_view(
        &web_api,
        "WebApiComponent",
        "Web API Container diagram for InPlacer content storage",
    )?;
    components.paper_size(PaperSize::A4Landscape);
    for id in [&customer, &accounts, &links, &contents, &db_context, &oauth, &mongo] {
        components.add(id)?;
    }

    b.add_context_section(
        &system,
        Format::Markdown,
        "Here is some context about the software system...\n\n![](embed:SystemContext)",
    )?;

    b.register_style(RelationshipStyle::new(tags::RELATIONSHIP).routing(Routing::Direct));
    b.register_style(
        ElementStyle::new(tags::SOFTWARE_SYSTEM)
            .background("#1168bd")
            .color("#ffffff")
            .shape(Shape::RoundedBox),
    );
    b.register_style(ElementStyle::new(tags::CONTAINER).background("#facc2E"));
    b.register_style(
        ElementStyle::new(tags::PERSON)
            .background("#08427b")
            .color("#ffffff")
            .shape(Shape::Person),
    );
    b.register_style(ElementStyle::new(MESSAGE_BUS_TAG).shape(Shape::Pipe).width(1200));
    b.register_style(ElementStyle::new(MICROSERVICE_TAG).shape(Shape::Hexagon));
    b.register_style(
        ElementStyle::new(DATA_STORE_TAG)
            .background("#f5da81")
            .shape(Shape::Cylinder),
    );
    b.register_style(
        ElementStyle::new(tags::COMPONENT)
            .background("#D4F3C0")
            .color("#000000")
            .shape(Shape::RoundedBox),
    );

    Ok(b.finalize())
}
