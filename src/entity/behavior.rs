use crate::entity::interaction::{InteractionResult, InteractiveTag};
use crate::entity::{Entity, EntityFlag, EntityKind};
use crate::mapping::ItemMapping;

const NAME_TAG: &str = "name_tag";
const LEAD: &str = "lead";
const RIDING_GEAR: &str = "saddle";

/// Everything an interaction evaluation may consult besides the entity
/// itself. Assembled by the caller from session state.
pub struct InteractionContext<'a> {
    pub item: &'a ItemMapping,
    pub sneaking: bool,
}

impl InteractionContext<'_> {
    fn stripped(&self) -> &str {
        self.item.stripped_identifier()
    }
}

/// Variant-specific interaction capability, selected by entity kind.
///
/// `interaction_tag` is the side-effect-free prediction; `interact` is the
/// authoritative action. The two must agree on whether a given item applies
/// (in particular on `can_eat`), so the client is never promised an action
/// the action path refuses.
pub trait Behavior: Sync {
    fn can_eat(&self, _stripped_identifier: &str) -> bool {
        false
    }

    fn interaction_tag(&self, entity: &Entity, ctx: &InteractionContext<'_>) -> InteractiveTag;

    fn interact(&self, entity: &mut Entity, ctx: &InteractionContext<'_>) -> InteractionResult;
}

/// Generic rules shared by every living variant: naming and leashing.
pub struct BaseBehavior;

impl Behavior for BaseBehavior {
    fn interaction_tag(&self, entity: &Entity, ctx: &InteractionContext<'_>) -> InteractiveTag {
        match ctx.stripped() {
            NAME_TAG => InteractiveTag::Name,
            LEAD if !entity.flag(EntityFlag::Leashed) => InteractiveTag::Leash,
            _ => InteractiveTag::None,
        }
    }

    fn interact(&self, entity: &mut Entity, ctx: &InteractionContext<'_>) -> InteractionResult {
        match ctx.stripped() {
            NAME_TAG => InteractionResult::Consume,
            LEAD if !entity.flag(EntityFlag::Leashed) => {
                entity.set_flag(EntityFlag::Leashed, true);
                InteractionResult::Success
            }
            _ => InteractionResult::Pass,
        }
    }
}

/// Feedable animals: feeding takes precedence over the generic rules.
pub struct AnimalBehavior {
    base: BaseBehavior,
    foods: &'static [&'static str],
}

impl AnimalBehavior {
    pub const fn new(foods: &'static [&'static str]) -> Self {
        Self {
            base: BaseBehavior,
            foods,
        }
    }
}

impl Behavior for AnimalBehavior {
    fn can_eat(&self, stripped_identifier: &str) -> bool {
        self.foods.contains(&stripped_identifier)
    }

    fn interaction_tag(&self, entity: &Entity, ctx: &InteractionContext<'_>) -> InteractiveTag {
        if self.can_eat(ctx.stripped()) {
            InteractiveTag::Feed
        } else {
            self.base.interaction_tag(entity, ctx)
        }
    }

    fn interact(&self, entity: &mut Entity, ctx: &InteractionContext<'_>) -> InteractionResult {
        if self.can_eat(ctx.stripped()) {
            InteractionResult::Consume
        } else {
            self.base.interact(entity, ctx)
        }
    }
}

/// Riding animals: mounting is checked strictly first, then the animal
/// evaluation, then an attempt to equip riding gear from the held item.
pub struct RideableBehavior {
    animal: AnimalBehavior,
}

impl RideableBehavior {
    pub const fn new(foods: &'static [&'static str]) -> Self {
        Self {
            animal: AnimalBehavior::new(foods),
        }
    }

    fn mount_applies(&self, entity: &Entity, ctx: &InteractionContext<'_>) -> bool {
        !self.can_eat(ctx.stripped())
            && entity.flag(EntityFlag::Saddled)
            && entity.passengers.is_empty()
            && !ctx.sneaking
    }

    fn gear_applies(&self, entity: &Entity, ctx: &InteractionContext<'_>) -> bool {
        ctx.stripped() == RIDING_GEAR && !entity.flag(EntityFlag::Saddled)
    }
}

impl Behavior for RideableBehavior {
    fn can_eat(&self, stripped_identifier: &str) -> bool {
        self.animal.can_eat(stripped_identifier)
    }

    fn interaction_tag(&self, entity: &Entity, ctx: &InteractionContext<'_>) -> InteractiveTag {
        if self.mount_applies(entity, ctx) {
            return InteractiveTag::Mount;
        }
        let tag = self.animal.interaction_tag(entity, ctx);
        if !tag.is_trivial() {
            return tag;
        }
        if self.gear_applies(entity, ctx) {
            InteractiveTag::EquipGear
        } else {
            InteractiveTag::None
        }
    }

    fn interact(&self, entity: &mut Entity, ctx: &InteractionContext<'_>) -> InteractionResult {
        if self.mount_applies(entity, ctx) {
            return InteractionResult::Success;
        }
        let result = self.animal.interact(entity, ctx);
        if result.consumes_action() {
            return result;
        }
        if self.gear_applies(entity, ctx) {
            entity.set_flag(EntityFlag::Saddled, true);
            InteractionResult::Consume
        } else {
            InteractionResult::Pass
        }
    }
}

static BASE: BaseBehavior = BaseBehavior;
static PIG: RideableBehavior = RideableBehavior::new(&["carrot", "potato", "beetroot"]);
static COW: AnimalBehavior = AnimalBehavior::new(&["wheat"]);
static SHEEP: AnimalBehavior = AnimalBehavior::new(&["wheat"]);

/// Capability table: variant tag to strategy. Unlisted kinds fall back to
/// the generic rules.
pub fn behavior_for(kind: EntityKind) -> &'static dyn Behavior {
    match kind {
        EntityKind::Pig => &PIG,
        EntityKind::Cow => &COW,
        EntityKind::Sheep => &SHEEP,
        _ => &BASE,
    }
}
